pub mod attendance;
pub mod member;
pub mod notice;
pub mod plan;
pub mod product;
pub mod workout;
