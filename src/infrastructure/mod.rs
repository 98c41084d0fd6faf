pub mod dom;

pub use dom::Dom;
