pub mod forecast;
pub mod macros;
pub mod night;
pub mod object;
pub mod satellite;
pub mod time;

pub use forecast::*;
pub use night::*;
pub use object::*;
pub use satellite::*;
pub use time::*;

crate::define_catalog_id!(u32, NoradId);
