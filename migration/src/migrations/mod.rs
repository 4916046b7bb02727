pub mod m202610160001_create_system_stats;
