//! Easel modifiers: transforms that wrap a curve function in a new one.

pub mod chain;
pub mod function;
pub mod modifier;

pub use chain::{ModifierChain, ModifierEntry};
pub use function::CurveFunction;
pub use modifier::{Convert, Discretizer, Modifier, Noise, SineWave, SquareWave};
