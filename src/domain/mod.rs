pub mod feedback;
pub mod membership;
pub mod package;
pub mod room;
pub mod schedule;
pub mod session;
pub mod user;

pub use feedback::*;
pub use membership::*;
pub use package::*;
pub use room::*;
pub use schedule::*;
pub use session::*;
pub use user::*;
