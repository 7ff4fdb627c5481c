pub mod hover;
pub mod selection;
pub mod translate;
