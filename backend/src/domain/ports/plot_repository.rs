//! Port abstraction for plot persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewPlot, Plot, PlotPatch};

use super::StoreError;

/// Typed create/read/update access to plot records.
///
/// Besides plain CRUD this port carries the two atomic transitions the
/// approval workflow needs so concurrent approvals cannot double-bind a
/// plot: [`PlotRepository::assign_if_available`] and
/// [`PlotRepository::release_if_held_by`] compare-and-swap on plot status
/// inside the store's write lock.
#[async_trait]
pub trait PlotRepository: Send + Sync {
    /// Create a plot, assigning the next id.
    async fn create(&self, plot: NewPlot) -> Result<Plot, StoreError>;

    /// Fetch a plot by id.
    async fn find(&self, id: i32) -> Result<Option<Plot>, StoreError>;

    /// Fetch a plot by unique plot number.
    async fn find_by_number(&self, plot_number: &str) -> Result<Option<Plot>, StoreError>;

    /// All plots.
    async fn list(&self) -> Result<Vec<Plot>, StoreError>;

    /// Shallow-merge the patch into an existing plot.
    async fn update(&self, id: i32, patch: PlotPatch) -> Result<Option<Plot>, StoreError>;

    /// Atomically bind the plot to a user when it is still `available`,
    /// moving it to `assigned`. Returns `None` when the plot is missing or
    /// no longer available.
    async fn assign_if_available(&self, id: i32, user_id: i32)
        -> Result<Option<Plot>, StoreError>;

    /// Atomically return the plot to `available` when it is currently held
    /// by the given user. Returns `None` when the plot is missing or held
    /// by someone else.
    async fn release_if_held_by(&self, id: i32, user_id: i32)
        -> Result<Option<Plot>, StoreError>;
}
