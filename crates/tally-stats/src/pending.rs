// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Metric inputs that may or may not be available yet.
//!
//! A [`Pending`] is either a value that is already at hand or a shared future
//! that will produce it. Metrics accept `Pending` inputs, resolve all of them
//! concurrently and only then run the synchronous computation, so callers
//! never branch on whether an input has been produced already.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture, Shared};
use futures::{try_join, FutureExt, TryFutureExt};

use crate::error::{Result, StatsError};

type SharedInput<T> = Shared<BoxFuture<'static, Result<Arc<T>>>>;

/// A metric input, either ready or still being produced.
///
/// Cloning is cheap. Clones of a deferred input share the underlying future,
/// so it is driven once no matter how many metrics consume it.
pub enum Pending<T> {
	Ready(Arc<T>),
	Deferred(SharedInput<T>),
}

impl<T> Pending<T> {
	pub fn ready(value: T) -> Self {
		Self::Ready(Arc::new(value))
	}

	pub fn shared(value: Arc<T>) -> Self {
		Self::Ready(value)
	}

	#[must_use]
	pub fn is_ready(&self) -> bool {
		matches!(self, Self::Ready(_))
	}

	/// Waits for the value. Resolving a ready input never suspends.
	pub async fn resolve(self) -> Result<Arc<T>> {
		match self {
			Self::Ready(value) => Ok(value),
			Self::Deferred(fut) => fut.await,
		}
	}
}

impl<T: Send + Sync + 'static> Pending<T> {
	/// Wraps a future producing the value. Its error, if any, is reported
	/// as [`StatsError::Resolution`] by every metric consuming the input.
	pub fn deferred<F, E>(fut: F) -> Self
	where
		F: Future<Output = std::result::Result<T, E>> + Send + 'static,
		E: std::error::Error + Send + Sync + 'static,
	{
		let fut = fut.map_ok(Arc::new).map_err(StatsError::resolution);
		Self::Deferred(fut.boxed().shared())
	}

	/// Derives a new input from this one without resolving it.
	pub fn map<U, F>(self, f: F) -> Pending<U>
	where
		U: Send + Sync + 'static,
		F: FnOnce(&T) -> U + Send + 'static,
	{
		match self {
			Self::Ready(value) => Pending::ready(f(&*value)),
			Self::Deferred(fut) => {
				let fut = fut.map_ok(move |value| Arc::new(f(&*value)));
				Pending::Deferred(fut.boxed().shared())
			}
		}
	}
}

impl<T> Clone for Pending<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Ready(value) => Self::Ready(Arc::clone(value)),
			Self::Deferred(fut) => Self::Deferred(fut.clone()),
		}
	}
}

impl<T> From<T> for Pending<T> {
	fn from(value: T) -> Self {
		Self::ready(value)
	}
}

impl<T: fmt::Debug> fmt::Debug for Pending<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
			Self::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}

/// Resolves `input` and applies `f` to the value.
pub async fn consume<T, R, F>(input: Pending<T>, f: F) -> Result<R>
where
	F: FnOnce(&T) -> R,
{
	let value = input.resolve().await?;
	Ok(f(&*value))
}

/// Resolves both inputs concurrently and applies `f` to the values.
pub async fn consume2<A, B, R, F>(a: Pending<A>, b: Pending<B>, f: F) -> Result<R>
where
	F: FnOnce(&A, &B) -> R,
{
	let (a, b) = try_join!(a.resolve(), b.resolve())?;
	Ok(f(&*a, &*b))
}

/// Resolves every input concurrently and applies `f` to the values, in the
/// order the inputs were given.
pub async fn consume_all<T, R, F>(inputs: Vec<Pending<T>>, f: F) -> Result<R>
where
	F: FnOnce(&[Arc<T>]) -> R,
{
	let values = try_join_all(inputs.into_iter().map(Pending::resolve)).await?;
	Ok(f(&values))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn failing() -> Pending<Vec<u32>> {
		Pending::deferred(async { Err::<Vec<u32>, _>(io::Error::other("store unavailable")) })
	}

	#[tokio::test]
	async fn test_ready_input() {
		let input = Pending::ready(vec![1, 2, 3]);
		assert!(input.is_ready());
		let sum = consume(input, |v: &Vec<u32>| v.iter().sum::<u32>()).await.unwrap();
		assert_eq!(sum, 6);
	}

	#[tokio::test]
	async fn test_deferred_input() {
		let input = Pending::deferred(async {
			tokio::task::yield_now().await;
			Ok::<_, io::Error>(vec![1, 2, 3])
		});
		assert!(!input.is_ready());
		let len = consume(input, Vec::len).await.unwrap();
		assert_eq!(len, 3);
	}

	#[tokio::test]
	async fn test_deferred_failure_propagates() {
		let err = consume(failing(), Vec::len).await.unwrap_err();
		assert!(err.to_string().contains("store unavailable"));
	}

	#[tokio::test]
	async fn test_one_failing_input_fails_all() {
		let inputs = vec![Pending::ready(vec![1]), failing(), Pending::ready(vec![2])];
		let result = consume_all(inputs, |values| values.len()).await;
		assert!(matches!(result, Err(StatsError::Resolution(_))));
	}

	#[tokio::test]
	async fn test_shared_input_runs_once() {
		let runs = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&runs);
		let input = Pending::deferred(async move {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok::<_, io::Error>(vec![5_u32, 7])
		});

		let (first, second) = try_join!(
			consume(input.clone(), |v: &Vec<u32>| v[0]),
			consume(input, |v: &Vec<u32>| v[1]),
		)
		.unwrap();

		assert_eq!((first, second), (5, 7));
		assert_eq!(runs.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_map_keeps_pending() {
		let input = Pending::deferred(async { Ok::<_, io::Error>(vec![1_u32, 2, 3]) });
		let doubled = input.map(|v| v.iter().map(|n| n * 2).collect::<Vec<_>>());
		assert!(!doubled.is_ready());
		assert_eq!(*doubled.resolve().await.unwrap(), vec![2, 4, 6]);

		let ready = Pending::ready(2_u32).map(|n| n + 1);
		assert!(ready.is_ready());
	}

	#[tokio::test]
	async fn test_consume2_mixes_ready_and_deferred() {
		let a = Pending::ready(2_u32);
		let b = Pending::deferred(async { Ok::<_, io::Error>(3_u32) });
		assert_eq!(consume2(a, b, |a, b| a * b).await.unwrap(), 6);
	}

	#[test]
	fn test_ready_resolves_without_runtime() {
		let value = tokio_test::block_on(Pending::ready("now").resolve()).unwrap();
		assert_eq!(*value, "now");
	}
}
