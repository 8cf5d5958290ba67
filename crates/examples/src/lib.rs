// Style.
#![allow(clippy::nonminimal_bool)]
#![allow(clippy::single_match)]

pub mod ar;
