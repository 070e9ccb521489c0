//! Bridges SeaORM's paginator to the core pagination contract: 1-based
//! page numbers, out-of-range requests clamped to the nearest valid page,
//! and one empty page for an empty collection.

use sea_orm::{ConnectionTrait, Paginator, SelectorTrait};

use gazette_core::error::RepoError;
use gazette_core::pagination::{Page, PageNumber};

/// Fetch the clamped page `number` from `paginator`.
pub async fn clamped_page<'db, C, S>(
    paginator: Paginator<'db, C, S>,
    number: PageNumber,
) -> Result<Page<S::Item>, RepoError>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let totals = paginator
        .num_items_and_pages()
        .await
        .map_err(|e| RepoError::Query(e.to_string()))?;

    let total_pages = totals.number_of_pages.max(1);
    let number = number.clamp(total_pages);

    // SeaORM pages are 0-based.
    let items = paginator
        .fetch_page(number - 1)
        .await
        .map_err(|e| RepoError::Query(e.to_string()))?;

    Ok(Page::new(items, number, total_pages, totals.number_of_items))
}
