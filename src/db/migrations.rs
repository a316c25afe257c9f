use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Schema steps in order; step `n` upgrades `user_version` from `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[include_str!("schemas/schema_v1.sql")];

pub(crate) const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/// Bring the nudge state schema up to date in a single transaction.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let found: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read schema version")?;

    if found < 0 {
        bail!("state database reports invalid schema {found}");
    }
    if found > SCHEMA_VERSION {
        bail!("state database is at schema {found}, this build only knows {SCHEMA_VERSION}");
    }

    let pending = &MIGRATIONS[found as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;
    for (offset, sql) in pending.iter().enumerate() {
        let target = found + offset as i32 + 1;
        tx.execute_batch(sql)
            .with_context(|| format!("failed to apply schema {target}"))?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .context("failed to record schema version")?;
    tx.commit().context("failed to commit schema upgrade")?;

    log::info!("state schema upgraded from {found} to {SCHEMA_VERSION}");
    Ok(())
}
