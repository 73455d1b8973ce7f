use super::product::ProductRepository;
use super::review::ReviewRepository;
use super::user::UserRepositoryInterface;

/// Unified access to all per-aggregate repositories.
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn products(&self) -> &dyn ProductRepository;
    fn reviews(&self) -> &dyn ReviewRepository;
}
