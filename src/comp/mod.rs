pub mod wall;
pub mod token;
pub mod fog;
pub mod map;
pub mod template;

pub use self::{
    wall::*,
    token::*,
    fog::*,
    map::*,
    template::*,
};
