pub mod movie;
pub mod position;

pub use movie::MovieRecord;
pub use position::Position;
