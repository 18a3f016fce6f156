//! Next-code allocation.
//!
//! The next code is derived from the code of the most recently inserted product (highest
//! id, not highest code). Its first and last characters are dropped, the remaining digits
//! are parsed and the offset is added. For `P00001` the middle segment is `0000`, so
//! `allocate(1)` yields `P00001` again, collides, and walks on to `P00002`.

use crate::domain::error::CatalogError;
use crate::storage::ProductRepository;
use tracing::{debug, warn};

/// Candidate used while no product exists.
pub const DEFAULT_CODE: &str = "P00001";

/// Upper bound on collision retries. The code space has 100 000 values.
pub const MAX_ATTEMPTS: u32 = 100_000;

/// Returns the first candidate code, starting at `start_offset`, that no product uses yet.
///
/// Nothing is written; the caller persists the code as part of its own product write.
pub async fn allocate<R>(repo: &mut R, start_offset: i32) -> Result<String, CatalogError>
where
    R: ProductRepository + ?Sized,
{
    allocate_within(repo, start_offset, MAX_ATTEMPTS).await
}

async fn allocate_within<R>(
    repo: &mut R,
    start_offset: i32,
    max_attempts: u32,
) -> Result<String, CatalogError>
where
    R: ProductRepository + ?Sized,
{
    let mut offset = start_offset;
    for _ in 0..max_attempts {
        let candidate = match repo.find_most_recently_inserted_product().await? {
            Some(latest) => derive_code(&latest.code, offset)?,
            None => DEFAULT_CODE.to_string(),
        };

        if !repo.exists_by_code(&candidate).await? {
            debug!(code = %candidate, offset, "allocated product code");
            return Ok(candidate);
        }

        debug!(code = %candidate, offset, "product code taken, retrying");
        offset = offset
            .checked_add(1)
            .ok_or_else(CatalogError::code_generation_failed)?;
    }

    warn!(start_offset, "product code allocation exhausted its retry bound");
    Err(CatalogError::code_generation_failed())
}

/// Builds a candidate from `latest_code` and `offset`.
///
/// Keeps characters `[1, len - 1)` of the latest code, adds `offset` and renders the sum
/// right-aligned in a width of five with `0` padding. Sums wider than five digits come out
/// unpadded and longer than a valid code.
pub fn derive_code(latest_code: &str, offset: i32) -> Result<String, CatalogError> {
    let chars: Vec<char> = latest_code.chars().collect();
    if chars.len() < 2 {
        warn!(latest_code, "latest product code is too short to derive from");
        return Err(CatalogError::code_generation_failed());
    }

    let middle: String = chars[1..chars.len() - 1].iter().collect();
    let number = middle
        .parse::<i32>()
        .ok()
        .and_then(|n| n.checked_add(offset))
        .ok_or_else(|| {
            warn!(latest_code, offset, "latest product code has no numeric body");
            CatalogError::code_generation_failed()
        })?;

    Ok(format!("P{:>5}", number).replace(' ', "0"))
}
