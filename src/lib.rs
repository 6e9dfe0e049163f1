pub mod catalog;
pub mod detect;
pub mod export;
pub mod guess;
pub mod io;
pub mod reference;
pub mod report;
pub mod sample;
pub mod scan;

pub mod prelude {
    pub use crate::detect::Detector;
    pub use crate::guess::HashGuess;
}
