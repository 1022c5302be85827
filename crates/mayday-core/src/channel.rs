//! The notification channel capability.

use std::future::Future;

use crate::alert::AlertContext;

/// A best-effort side channel for telling someone about an alert.
///
/// Channels are infallible at this seam: implementations convert every
/// provider failure (HTTP error, timeout, rejected payload) into a `false`
/// outcome and log the detail. Each attempt makes at most one provider
/// call; there are no retries.
pub trait NotifyChannel: Send + Sync {
  /// Short label used in logs (e.g. `"push"`, `"email"`).
  fn name(&self) -> &'static str;

  /// Try to deliver a notification for `alert`. Returns whether the
  /// provider accepted it.
  fn attempt<'a>(
    &'a self,
    alert: &'a AlertContext,
  ) -> impl Future<Output = bool> + Send + 'a;
}
