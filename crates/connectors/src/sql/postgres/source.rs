use crate::sql::{
    base::error::{ConnectorError, DbError},
    postgres::{row::PgRowReader, utils::connect_client},
};
use futures_util::{TryStreamExt, pin_mut};
use model::records::row::RowData;
use std::iter;
use tokio_postgres::Client;
use tracing::debug;

/// Read-only handle on the source database.
pub struct PgSource {
    client: Client,
}

impl PgSource {
    pub async fn connect(conn_str: &str) -> Result<Self, ConnectorError> {
        let client = connect_client(conn_str).await?;
        Ok(PgSource { client })
    }

    /// Runs `sql` and decodes each row as the cursor yields it.
    pub async fn query_rows(&self, sql: &str) -> Result<Vec<RowData>, DbError> {
        let stream = self.client.query_raw(sql, iter::empty::<&str>()).await?;
        pin_mut!(stream);

        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(PgRowReader::new(&row).to_row_data()?);
        }
        debug!(rows = rows.len(), "Source query returned");
        Ok(rows)
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        let row = self.client.query_one("SELECT 1", &[]).await?;
        let val: i32 = row.try_get(0)?;
        if val != 1 {
            return Err(DbError::Unexpected(format!(
                "Postgres ping returned unexpected result: {val}"
            )));
        }
        Ok(())
    }
}
