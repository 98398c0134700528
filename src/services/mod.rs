pub mod auth_service;
pub mod db_init;
pub mod ledger_service;
pub mod quotes;
