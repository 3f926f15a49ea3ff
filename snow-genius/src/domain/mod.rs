//! Domain types and services for pricing ski passes.
//!
//! Purpose: turn rider and resort rows into the exact payload a scoring
//! service expects, and interpret what comes back. Nothing here touches the
//! network; the [`ports::ScoringService`] port sits between the submission
//! service and the transport.
//!
//! Public surface:
//! - FormState, RiderRow, ResortRow: raw form rows and their validation.
//! - Rider, RiderCategory, ResortSelection: validated inputs.
//! - ScoringMode, ScoringPayload, build_payload: backend wire shapes.
//! - ScoringResponse, ResponseBody, Recommendation: decoded responses.
//! - render_response, write_response, format_usd: plain-text presentation.
//! - SubmissionService: validate, build, and send once.

mod form;
mod payload;
pub mod ports;
mod recommendation;
mod render;
mod resort_selection;
mod rider;
mod submission;

pub use self::form::{FormError, FormErrors, FormState, ResortRow, RiderRow, ValidatedForm};
pub use self::payload::{
    AutoPayload, AutoResort, AutoRider, LegacyRider, MultiPassPayload, ParseScoringModeError,
    ResortDay, ResortPlanItem, ScoringMode, ScoringPayload, SinglePassPayload, build_payload,
};
pub(crate) use self::recommendation::is_truthy;
pub use self::recommendation::{PassPick, Recommendation, ResponseBody, ScoringResponse, Unmet};
pub use self::render::{RenderOptions, format_usd, render_response, write_response};
pub use self::resort_selection::{ResolvedResort, ResortSelection, resolve_resort};
pub use self::rider::{Rider, RiderCategory};
pub use self::submission::{Submission, SubmissionError, SubmissionService};
