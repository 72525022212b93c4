//! Capability interface towards the host's scripting engine.
//!
//! Compiling a script is the host's business. What the query layer consumes is a
//! [`ScoreScriptFactory`]: it is shared by all of the searches using the same
//! script, and creates one [`ScoreScript`] per segment and per search.
//!
//! [`FnScriptFactory`] adapts a plain Rust closure to this interface.

mod context;
mod fn_script;
mod score_script;
#[allow(clippy::module_inception)]
mod script;

pub use self::context::{IndexVersion, ScriptContext};
pub use self::fn_script::{FnScriptFactory, ScriptDoc, ScriptFn};
pub use self::score_script::{ExplanationHolder, ScoreScript, ScoreScriptFactory};
pub use self::script::{Script, DEFAULT_SCRIPT_LANG};
