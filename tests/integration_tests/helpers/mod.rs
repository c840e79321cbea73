mod test_postgres;

pub use test_postgres::TestPostgres;
