use crate::error::MetricError;
use crate::lifecycle::{RegistrationComponent, RegistrationContext};

/// A minimal registration driver that walks the lifecycle of one component
/// over every level of an `L`-level pyramid, coarsest first.
#[derive(Debug, Clone)]
pub struct ResolutionDriver {
    number_of_resolutions: usize,
    number_of_parameters: usize,
    current_level: usize,
}

impl ResolutionDriver {
    /// Create a driver for `number_of_resolutions` levels and a transform with
    /// `number_of_parameters` parameters.
    pub fn new(number_of_resolutions: usize, number_of_parameters: usize) -> Self {
        Self {
            number_of_resolutions,
            number_of_parameters,
            current_level: 0,
        }
    }

    /// Number of levels the driver walks.
    pub fn number_of_resolutions(&self) -> usize {
        self.number_of_resolutions
    }

    /// Run the full lifecycle of `component`.
    ///
    /// `on_level` is called after `before_each_resolution` for every level,
    /// where a real driver would optimize the transform. The first error
    /// stops the run and is returned.
    pub fn run<C, F>(&mut self, component: &mut C, mut on_level: F) -> Result<(), MetricError>
    where
        C: RegistrationComponent,
        F: FnMut(usize, &C) -> Result<(), MetricError>,
    {
        component.before_all()?;
        component.before_registration()?;
        component.initialize()?;

        for level in 0..self.number_of_resolutions {
            self.current_level = level;
            log::info!("Resolution: {level}");
            component.before_each_resolution(&*self)?;
            on_level(level, component)?;
        }

        component.after_registration()
    }
}

impl RegistrationContext for ResolutionDriver {
    fn current_level(&self) -> usize {
        self.current_level
    }

    fn number_of_parameters(&self) -> usize {
        self.number_of_parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl RegistrationComponent for Recorder {
        fn before_all(&mut self) -> Result<(), MetricError> {
            self.calls.push("before_all".into());
            Ok(())
        }

        fn before_registration(&mut self) -> Result<(), MetricError> {
            self.calls.push("before_registration".into());
            Ok(())
        }

        fn initialize(&mut self) -> Result<(), MetricError> {
            self.calls.push("initialize".into());
            Ok(())
        }

        fn before_each_resolution(
            &mut self,
            context: &dyn RegistrationContext,
        ) -> Result<(), MetricError> {
            self.calls.push(format!(
                "level {} params {}",
                context.current_level(),
                context.number_of_parameters()
            ));
            Ok(())
        }

        fn after_registration(&mut self) -> Result<(), MetricError> {
            self.calls.push("after_registration".into());
            Ok(())
        }
    }

    #[test]
    fn driver_calls_hooks_in_order() -> Result<(), MetricError> {
        let mut recorder = Recorder::default();
        let mut visited = Vec::new();

        ResolutionDriver::new(2, 4).run(&mut recorder, |level, _| {
            visited.push(level);
            Ok(())
        })?;

        assert_eq!(visited, vec![0, 1]);
        assert_eq!(
            recorder.calls,
            vec![
                "before_all",
                "before_registration",
                "initialize",
                "level 0 params 4",
                "level 1 params 4",
                "after_registration",
            ]
        );
        Ok(())
    }

    #[test]
    fn driver_stops_on_error() {
        let mut recorder = Recorder::default();
        let res = ResolutionDriver::new(3, 1).run(&mut recorder, |level, _| {
            if level == 1 {
                return Err(MetricError::Initialization("stop".into()));
            }
            Ok(())
        });

        assert!(res.is_err());
        assert!(!recorder.calls.iter().any(|c| c == "after_registration"));
        assert_eq!(recorder.calls.last().map(String::as_str), Some("level 1 params 1"));
    }
}
