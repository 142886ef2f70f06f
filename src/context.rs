use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContextError {
    #[error("Invalid parameter '{param}': {value} (must be finite and positive)")]
    InvalidParameter { param: &'static str, value: f64 },
}

/// Background state of the expanding universe at the current step.
///
/// `temperature` is the conformal temperature the decoupling threshold is
/// compared against, `hubble_rate` is in the same units as the momenta and
/// `step` is the step size in the evolution variable `ln a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CosmologyContext {
    temperature: f64,
    scale_factor: f64,
    hubble_rate: f64,
    step: f64,
}

impl CosmologyContext {
    pub fn new(
        temperature: f64,
        scale_factor: f64,
        hubble_rate: f64,
        step: f64,
    ) -> Result<Self, ContextError> {
        for (param, value) in [
            ("temperature", temperature),
            ("scale_factor", scale_factor),
            ("hubble_rate", hubble_rate),
            ("step", step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ContextError::InvalidParameter { param, value });
            }
        }
        Ok(Self {
            temperature,
            scale_factor,
            hubble_rate,
            step,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn hubble_rate(&self) -> f64 {
        self.hubble_rate
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Same background with a different step size.
    pub fn with_step(self, step: f64) -> Result<Self, ContextError> {
        Self::new(self.temperature, self.scale_factor, self.hubble_rate, step)
    }
}

impl Default for CosmologyContext {
    /// Unit background: `T = a = H = 1` with a step of `0.01` in `ln a`.
    fn default() -> Self {
        Self {
            temperature: 1.0,
            scale_factor: 1.0,
            hubble_rate: 1.0,
            step: 0.01,
        }
    }
}
