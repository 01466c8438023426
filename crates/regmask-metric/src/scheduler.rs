use std::path::{Path, PathBuf};
use std::time::Instant;

use regmask_image::Mask;

use crate::config::Configuration;
use crate::error::MetricError;
use crate::lifecycle::{Hook, LifecycleState, RegistrationComponent, RegistrationContext};
use crate::metric_base::{MaskedMetric, MetricBase};
use crate::provider::{FileMaskProvider, MaskEroder, MaskProvider, MorphologyEroder};
use crate::schedule::{erosion_radius, MaskRole};

const BEFORE_REGISTRATION_STAGE: &str = "MaskErosionScheduler - before_registration";

/// A mask exactly as it was loaded from storage.
///
/// Only read access is exposed. Every per-level erosion starts from this copy,
/// never from a previously eroded mask.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalMask {
    path: PathBuf,
    mask: Mask,
}

impl OriginalMask {
    /// The path the mask was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded mask.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// Installs, at every resolution level, the fixed and moving masks eroded by
/// the radius that level's pyramid smoothing requires.
///
/// The masks are loaded once in `before_registration` from the paths given by
/// the `-fMask` and `-mMask` command line arguments. A role without a path has
/// no mask at all and is skipped at every level.
///
/// # Example
///
/// ```
/// use regmask_metric::{
///     Configuration, MaskErosionScheduler, MaskedMetric, MetricBase, ResolutionDriver,
/// };
///
/// let config = Configuration::new().with_parameter("NumberOfResolutions", ["2"]);
/// let mut scheduler = MaskErosionScheduler::new(config, MetricBase::new());
///
/// let mut driver = ResolutionDriver::new(2, 6);
/// driver.run(&mut scheduler, |_, _| Ok(())).unwrap();
///
/// assert_eq!(scheduler.metric().derivative_step_length_scales(), &[1.0; 6]);
/// ```
pub struct MaskErosionScheduler<M, P = FileMaskProvider, E = MorphologyEroder> {
    config: Configuration,
    metric: M,
    provider: P,
    eroder: E,
    fixed: Option<OriginalMask>,
    moving: Option<OriginalMask>,
    state: LifecycleState,
}

impl<M: MaskedMetric> MaskErosionScheduler<M> {
    /// Create a scheduler reading masks from files and eroding them with a ball.
    pub fn new(config: Configuration, metric: M) -> Self {
        Self::with_collaborators(config, metric, FileMaskProvider, MorphologyEroder::default())
    }
}

impl<M, P, E> MaskErosionScheduler<M, P, E>
where
    M: MaskedMetric,
    P: MaskProvider,
    E: MaskEroder,
{
    /// Create a scheduler with a custom mask provider and erosion primitive.
    pub fn with_collaborators(config: Configuration, metric: M, provider: P, eroder: E) -> Self {
        Self {
            config,
            metric,
            provider,
            eroder,
            fixed: None,
            moving: None,
            state: LifecycleState::Uninitialized,
        }
    }

    /// The metric the masks are installed into.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Consume the scheduler and return the metric.
    pub fn into_metric(self) -> M {
        self.metric
    }

    /// The configuration source.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The mask loaded for `role`, if one was requested.
    pub fn original_mask(&self, role: MaskRole) -> Option<&OriginalMask> {
        match role {
            MaskRole::Fixed => self.fixed.as_ref(),
            MaskRole::Moving => self.moving.as_ref(),
        }
    }

    fn mask_path(&self, role: MaskRole) -> Option<&str> {
        self.config.command_line_argument(role.command_line_key())
    }

    fn load_original(&self, role: MaskRole) -> Result<Option<OriginalMask>, MetricError> {
        let Some(path) = self.mask_path(role) else {
            log::info!("{}\t\tunspecified, so no {role} mask used", role.command_line_key());
            return Ok(None);
        };

        let path = PathBuf::from(path);
        let mask = self
            .provider
            .load(&path)
            .map_err(|source| MetricError::MaskLoad {
                role,
                stage: BEFORE_REGISTRATION_STAGE,
                source,
            })?;

        log::info!(
            "{}\t\t{} ({}x{}, {} foreground pixels)",
            role.command_line_key(),
            path.display(),
            mask.width(),
            mask.height(),
            mask.count_foreground()
        );

        Ok(Some(OriginalMask { path, mask }))
    }

    fn install_eroded(
        &mut self,
        role: MaskRole,
        level: usize,
        number_of_resolutions: usize,
    ) -> Result<(), MetricError> {
        let Some(original) = self.original_mask(role) else {
            return Ok(());
        };

        let radius = erosion_radius(role, level, number_of_resolutions);
        let eroded = self
            .eroder
            .erode(original.mask(), radius)
            .map_err(|source| MetricError::Erosion { role, source })?;

        log::debug!(
            "level {level}: eroded {role} mask with radius {radius}, {} foreground pixels left",
            eroded.count_foreground()
        );

        self.metric.set_mask(role, Some(eroded));
        Ok(())
    }
}

impl<M, P, E> RegistrationComponent for MaskErosionScheduler<M, P, E>
where
    M: MaskedMetric,
    P: MaskProvider,
    E: MaskEroder,
{
    fn before_all(&mut self) -> Result<(), MetricError> {
        let next = self.state.advance(Hook::BeforeAll)?;

        log::info!("Command line options:");
        for role in MaskRole::ALL {
            match self.mask_path(role) {
                Some(path) => log::info!("{}\t\t{path}", role.command_line_key()),
                None => log::info!(
                    "{}\t\tunspecified, so no {role} mask used",
                    role.command_line_key()
                ),
            }
        }

        self.state = next;
        Ok(())
    }

    fn before_registration(&mut self) -> Result<(), MetricError> {
        let next = self.state.advance(Hook::BeforeRegistration)?;

        // a failed fixed load returns before the moving mask is attempted
        let fixed = self.load_original(MaskRole::Fixed)?;
        let moving = self.load_original(MaskRole::Moving)?;

        self.fixed = fixed;
        self.moving = moving;

        for role in MaskRole::ALL {
            let mask = self.original_mask(role).map(|original| original.mask().clone());
            self.metric.set_mask(role, mask);
        }

        self.state = next;
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), MetricError> {
        let next = self.state.advance(Hook::Initialize)?;

        let now = Instant::now();
        self.metric.initialize()?;
        log::info!(
            "Initialization of the masked metric took: {} ms.",
            now.elapsed().as_millis()
        );

        self.state = next;
        Ok(())
    }

    fn before_each_resolution(
        &mut self,
        context: &dyn RegistrationContext,
    ) -> Result<(), MetricError> {
        let level = context.current_level();
        let next = self.state.advance(Hook::BeforeEachResolution(level))?;

        // TODO: read per-parameter weights once the metric supports them
        let scales = vec![1.0; context.number_of_parameters()];
        self.metric.set_derivative_step_length_scales(scales);

        let number_of_resolutions = self.config.number_of_resolutions();
        for role in MaskRole::ALL {
            self.install_eroded(role, level, number_of_resolutions)?;
        }

        self.state = next;
        Ok(())
    }

    fn after_registration(&mut self) -> Result<(), MetricError> {
        self.state = self.state.advance(Hook::AfterRegistration)?;
        Ok(())
    }
}

impl Default for MaskErosionScheduler<MetricBase> {
    fn default() -> Self {
        Self::new(Configuration::default(), MetricBase::default())
    }
}
