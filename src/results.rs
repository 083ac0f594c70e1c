mod record;
mod statement_result;

pub use record::Record;
pub use statement_result::{RowsBuilder, StatementResult};
