//! Campaign configuration wizard: per-step validation schemas, the
//! step-navigation state machine, and resume-step inference for reloaded
//! drafts.

pub mod controller;
pub mod resume;
pub mod steps;

pub use controller::{
    FinishOutcome, NavigationMode, NextOutcome, WizardController, WizardState, REVIEW_INDEX,
};
pub use steps::{StepId, StepValidation, STEP_ORDER};
