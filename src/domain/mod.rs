mod filing;

pub use filing::*;
