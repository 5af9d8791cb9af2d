pub mod dist;
pub mod docs;
pub mod docset;
pub mod lint;
pub mod list;
pub mod multiversion;
pub mod test;
pub mod typecheck;
