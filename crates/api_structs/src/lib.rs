mod occurrence;
mod recurrence;
mod shared;

pub mod dtos {
    pub use crate::occurrence::dtos::*;
    pub use crate::recurrence::dtos::*;
}

pub mod codec {
    pub use crate::recurrence::codec::*;
}

pub mod legacy {
    pub use crate::recurrence::legacy::*;
}

pub use crate::occurrence::api::*;
