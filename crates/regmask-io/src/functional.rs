use std::{fs::File, path::Path};

use regmask_image::Mask;

use crate::{error::IoError, png::decode_png_impl};

/// Reads a mask from the given file path, detecting the format from the extension.
///
/// Only PNG files are supported at the moment.
///
/// # Arguments
///
/// * `file_path` - The path to the mask file.
///
/// # Returns
///
/// A binary mask where non-zero pixels of the stored image are foreground.
///
/// # Example
///
/// ```no_run
/// use regmask_io::functional as F;
///
/// let mask = F::read_mask("fixed_mask.png").unwrap();
/// println!("foreground pixels: {}", mask.count_foreground());
/// ```
pub fn read_mask(file_path: impl AsRef<Path>) -> Result<Mask, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => decode_png_impl(File::open(file_path)?),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::write_mask_png;

    #[test]
    fn read_mask_any() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("MASK.PNG");

        let mask = Mask::new([2, 2].into(), vec![1, 0, 0, 1])?;
        write_mask_png(&file_path, &mask)?;

        assert_eq!(read_mask(&file_path)?, mask);
        Ok(())
    }

    #[test]
    fn read_mask_unsupported_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("mask.mhd");
        std::fs::write(&file_path, b"ObjectType = Image")?;

        let res = read_mask(&file_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }

    #[test]
    fn read_mask_corrupted_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("mask.Png");
        std::fs::write(&file_path, b"not a png")?;

        let res = read_mask(&file_path);
        assert!(matches!(res, Err(IoError::PngDecodeError(_))));
        Ok(())
    }

    #[test]
    fn read_mask_missing() {
        let res = read_mask("missing_mask.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
