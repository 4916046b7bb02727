pub mod system_stat;
