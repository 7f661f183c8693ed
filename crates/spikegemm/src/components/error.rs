use std::fmt::{Debug, Display};

use crate::components::{OperatorClass, SharedMemoryClear};

/// Errors that can occur while assembling a spike matmul.
pub enum MatmulSetupError {
    /// The requested pipeline variant is not specialized by this engine.
    Unavailable(MatmulAvailabilityError),

    /// The provided configuration is invalid or rejected by a component.
    InvalidConfig(InvalidConfigError),
}

/// A pipeline variant outside the specialized tuple was requested.
///
/// Only the lane-parallel operator class with a two-stage pipeline and no
/// staging-clear option is assembled here; everything else must be refused
/// before any compute is built.
pub enum MatmulAvailabilityError {
    /// The requested operator class has no spike specialization.
    OperatorClassUnsupported { op_class: OperatorClass },

    /// The requested pipeline depth has no spike specialization.
    PipelineStagesUnsupported { stages: u32 },

    /// Staging buffers are never cleared on the spike path.
    SharedMemoryClearUnsupported { option: SharedMemoryClear },
}

impl From<MatmulAvailabilityError> for MatmulSetupError {
    fn from(value: MatmulAvailabilityError) -> Self {
        Self::Unavailable(value)
    }
}

impl From<InvalidConfigError> for MatmulSetupError {
    fn from(value: InvalidConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

impl Display for MatmulSetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Debug for MatmulSetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatmulSetupError::Unavailable(err) => {
                writeln!(
                    f,
                    "Unable to assemble matmul because a required variant is unavailable: {err:?}"
                )
            }
            MatmulSetupError::InvalidConfig(err) => {
                writeln!(
                    f,
                    "Unable to assemble matmul because the config is invalid: {:?}",
                    err.to_string()
                )
            }
        }
    }
}

impl Debug for MatmulAvailabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatmulAvailabilityError::OperatorClassUnsupported { op_class } => {
                writeln!(
                    f,
                    "Operator class {op_class:?} unsupported. Only Simt is specialized."
                )
            }
            MatmulAvailabilityError::PipelineStagesUnsupported { stages } => {
                writeln!(
                    f,
                    "Pipeline depth {stages} unsupported. Only the two-stage pipeline is specialized."
                )
            }
            MatmulAvailabilityError::SharedMemoryClearUnsupported { option } => {
                writeln!(f, "Shared memory clear option {option:?} unsupported.")
            }
        }
    }
}

/// Error that arises from invalid configurations
pub type InvalidConfigError = Box<dyn Display>;

/// Error that arises from invalid configurations
pub struct FormattedConfigError {
    func: Box<dyn Fn() -> String>,
}

impl FormattedConfigError {
    #[allow(clippy::new_ret_no_self)]
    pub fn new<F: Fn() -> String + 'static>(func: F) -> Box<dyn Display> {
        Box::new(Self {
            func: Box::new(func),
        })
    }
}

impl Display for FormattedConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = (self.func)();
        write!(f, "{string}")
    }
}
