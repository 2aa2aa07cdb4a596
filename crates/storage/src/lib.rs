pub mod db;

pub use db::{
    create_db, delete_portfolio_record, get_all_portfolio_records, get_portfolio_record,
    insert_portfolio_record, insert_portfolio_records, set_record_image, set_record_visibility,
    update_portfolio_record, DbPool, PortfolioEntry,
};
