//! Favourite-toggle decision logic.
//!
//! The favourites view exposes one star button per term; pressing it adds
//! the term when absent and removes it when present. The decision lives
//! here, behind the [`FavoriteGateway`] port, so it is testable without a
//! network.

use super::error::ClientError;
use super::ports::FavoriteGateway;

/// Flip a term's favourite membership.
///
/// Returns `true` when the term is a favourite after the call, `false` when
/// it was just removed.
///
/// # Errors
///
/// Returns [`ClientError`] when the membership read or the mutation fails.
pub async fn toggle_favorite(
    gateway: &dyn FavoriteGateway,
    term_id: i64,
) -> Result<bool, ClientError> {
    let favorites = gateway.favorites().await?;
    if favorites.iter().any(|favorite| favorite.term_id == term_id) {
        gateway.remove_favorite(term_id).await?;
        Ok(false)
    } else {
        gateway.add_favorite(term_id).await?;
        Ok(true)
    }
}
