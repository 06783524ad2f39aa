pub mod form;
pub mod markup;
pub mod output;
