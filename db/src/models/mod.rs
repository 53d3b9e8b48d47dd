pub mod test_block;
pub mod test_group;

pub use test_block::Entity as TestBlock;
pub use test_group::Entity as TestGroup;
