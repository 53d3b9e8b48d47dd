pub mod m202410140001_create_test_groups;
pub mod m202410140002_create_test_blocks;
