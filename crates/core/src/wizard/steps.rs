//! Institution wizard step definitions.
//!
//! The wizard has five screens, numbered 1..=5. Step numbers are what the
//! step indicator and the controller deal in; [`WizardStep`] is the typed
//! view used by the validator.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The five steps of the institution onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Identity,
    Academics,
    Infrastructure,
    Contact,
    Review,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 5;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = TOTAL_STEPS;

/// Static description of one step, as rendered by the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub id: WizardStep,
    pub label: &'static str,
    /// Icon reference understood by the front-end icon set.
    pub icon: &'static str,
}

/// Ordered step table. Index `i` describes step number `i + 1`.
pub const STEPS: [StepDefinition; TOTAL_STEPS as usize] = [
    StepDefinition {
        id: WizardStep::Identity,
        label: "Identity",
        icon: "building",
    },
    StepDefinition {
        id: WizardStep::Academics,
        label: "Academics",
        icon: "graduation-cap",
    },
    StepDefinition {
        id: WizardStep::Infrastructure,
        label: "Infrastructure",
        icon: "layers",
    },
    StepDefinition {
        id: WizardStep::Contact,
        label: "Contact",
        icon: "map-pin",
    },
    StepDefinition {
        id: WizardStep::Review,
        label: "Review",
        icon: "check-circle",
    },
];

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Identity),
            2 => Ok(Self::Academics),
            3 => Ok(Self::Infrastructure),
            4 => Ok(Self::Contact),
            5 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Academics => 2,
            Self::Infrastructure => 3,
            Self::Contact => 4,
            Self::Review => 5,
        }
    }

    /// The step table entry for this step.
    pub fn definition(self) -> &'static StepDefinition {
        &STEPS[(self.to_number() - 1) as usize]
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        self.definition().label
    }

    /// Whether this is the last step, from which the form is submitted.
    pub fn is_final(self) -> bool {
        self.to_number() == MAX_STEP
    }
}

/// Clamp an arbitrary step number into `MIN_STEP..=MAX_STEP`.
pub fn clamp_step(n: u8) -> u8 {
    n.clamp(MIN_STEP, MAX_STEP)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
