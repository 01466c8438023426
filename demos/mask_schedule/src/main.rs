use argh::FromArgs;
use std::path::PathBuf;

use regmask::{
    image::Mask,
    io::png::write_mask_png,
    metric::{
        Configuration, ErosionSchedule, MaskErosionScheduler, MaskRole, MaskedMetric, MetricBase,
        ResolutionDriver,
    },
};

#[derive(FromArgs)]
/// Erode fixed and moving masks for every level of a registration pyramid
struct Args {
    /// path to the fixed image mask
    #[argh(option, short = 'f')]
    fixed_mask: Option<PathBuf>,

    /// path to the moving image mask
    #[argh(option, short = 'm')]
    moving_mask: Option<PathBuf>,

    /// path to a `(Key value ...)` parameter file
    #[argh(option, short = 'p')]
    parameters: Option<PathBuf>,

    /// number of resolution levels, overrides the parameter file
    #[argh(option, short = 'r')]
    resolutions: Option<usize>,

    /// number of transform parameters (default: 6)
    #[argh(option, short = 'n', default = "6")]
    num_parameters: usize,

    /// directory to write the eroded masks of every level to
    #[argh(option, short = 'o')]
    output_dir: Option<PathBuf>,
}

type LevelMask = (usize, MaskRole, Mask);

/// Log the masks installed at `level`, keeping a copy of each in `eroded` if given.
fn report_level(level: usize, metric: &MetricBase, mut eroded: Option<&mut Vec<LevelMask>>) {
    for role in MaskRole::ALL {
        if let Some(mask) = metric.mask(role) {
            log::info!(
                "level {level}: {role} mask keeps {} of {} pixels",
                mask.count_foreground(),
                mask.width() * mask.height()
            );
            if let Some(eroded) = eroded.as_deref_mut() {
                eroded.push((level, role, mask.clone()));
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.parameters {
        Some(path) => Configuration::from_parameter_file(path)?,
        None => Configuration::new(),
    };
    if let Some(resolutions) = args.resolutions {
        config = config.with_parameter("NumberOfResolutions", [resolutions.to_string()]);
    }
    for (role, path) in [
        (MaskRole::Fixed, &args.fixed_mask),
        (MaskRole::Moving, &args.moving_mask),
    ] {
        if let Some(path) = path {
            config = config
                .with_command_line_argument(role.command_line_key(), path.to_string_lossy());
        }
    }

    let number_of_resolutions = config.number_of_resolutions();
    println!("level\tfixed radius\tmoving radius");
    for radii in ErosionSchedule::new(number_of_resolutions).levels() {
        println!("{}\t{}\t\t{}", radii.level, radii.fixed, radii.moving);
    }

    let mut scheduler = MaskErosionScheduler::new(config, MetricBase::new());
    let mut driver = ResolutionDriver::new(number_of_resolutions, args.num_parameters);

    // masks are only kept when they will be written
    let mut eroded = args.output_dir.as_ref().map(|_| Vec::new());
    driver.run(&mut scheduler, |level, scheduler| {
        report_level(level, scheduler.metric(), eroded.as_mut());
        Ok(())
    })?;

    if let (Some(output_dir), Some(eroded)) = (args.output_dir, eroded) {
        std::fs::create_dir_all(&output_dir)?;
        for (level, role, mask) in &eroded {
            let path = output_dir.join(format!("{role}_mask_level{level}.png"));
            write_mask_png(&path, mask)?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
