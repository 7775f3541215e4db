//! Runs evaluation stages as concurrent tasks connected by bounded channels.
//!
//! Every send races a [`CancellationToken`] shared by all stages of a pipeline. The stream handed
//! to the consumer owns a [`DropGuard`] of that token, so dropping it stops every producer at its
//! next send instead of leaving it blocked on a full channel.

use crate::bgp_node::{BgpNode, BindingsStream};
use crate::error::QueryEvaluationError;
use futures::stream::BoxStream;
use futures::{stream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;
use triplestream_model::{BindingsGroup, Triple};

type BindingsResult = Result<BindingsGroup, QueryEvaluationError>;

/// Sends `item` unless the pipeline is cancelled first. Returns whether the item was delivered.
async fn send<T>(sender: &Sender<T>, token: &CancellationToken, item: T) -> bool {
    tokio::select! {
        biased;
        () = token.cancelled() => false,
        sent = sender.send(item) => sent.is_ok(),
    }
}

/// Forwards `results` until exhausted, cancelled, or after the first error.
async fn forward(
    mut results: BindingsStream,
    sender: &Sender<BindingsResult>,
    token: &CancellationToken,
) -> bool {
    while let Some(result) = results.next().await {
        let failed = result.is_err();
        if !send(sender, token, result).await || failed {
            return false;
        }
    }
    true
}

/// Wraps the final receiver of a pipeline. Dropping the stream cancels the pipeline.
fn into_stream<T: Send + 'static>(
    receiver: Receiver<T>,
    guard: DropGuard,
) -> BoxStream<'static, T> {
    stream::unfold((receiver, guard), |(mut receiver, guard)| async move {
        let item = receiver.recv().await?;
        Some((item, (receiver, guard)))
    })
    .boxed()
}

fn spawn_source(
    node: BgpNode,
    capacity: usize,
    token: CancellationToken,
) -> Receiver<BindingsResult> {
    let (sender, receiver) = mpsc::channel(capacity);
    tokio::spawn(async move {
        forward(node.execute(), &sender, &token).await;
    });
    receiver
}

/// Runs `node` once per group received from `input`.
fn spawn_join(
    node: BgpNode,
    mut input: Receiver<BindingsResult>,
    capacity: usize,
    token: CancellationToken,
) -> Receiver<BindingsResult> {
    let (sender, receiver) = mpsc::channel(capacity);
    tokio::spawn(async move {
        loop {
            let incoming = tokio::select! {
                biased;
                () = token.cancelled() => return,
                incoming = input.recv() => incoming,
            };
            let results = match incoming {
                None => return,
                Some(Ok(group)) => node.execute_with(group),
                Some(Err(error)) => {
                    send(&sender, &token, Err(error)).await;
                    return;
                }
            };
            if !forward(results, &sender, &token).await {
                return;
            }
        }
    });
    receiver
}

/// Evaluates `nodes` as a left-deep join with one task per node.
///
/// Must be called within a Tokio runtime.
pub(crate) fn spawn_pipeline(nodes: &[BgpNode], capacity: usize) -> BindingsStream {
    let token = CancellationToken::new();
    let Some((first, rest)) = nodes.split_first() else {
        return stream::once(async { Ok(BindingsGroup::new()) }).boxed();
    };

    let mut receiver = spawn_source(first.clone(), capacity, token.clone());
    for node in rest {
        receiver = spawn_join(node.clone(), receiver, capacity, token.clone());
    }
    debug!("Spawned a pipeline of {} stages", nodes.len());
    into_stream(receiver, token.drop_guard())
}

/// The consumer side of [`spawn_triple_reader`].
///
/// Dropping the reader cancels the producing task.
pub struct TripleReader<E> {
    receiver: Receiver<Result<Triple, E>>,
    handle: JoinHandle<Result<usize, QueryEvaluationError>>,
    token: CancellationToken,
    _guard: DropGuard,
}

impl<E> TripleReader<E> {
    /// Stops the producer at its next send.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits for the producer and returns the number of items it delivered.
    ///
    /// Fails with [`QueryEvaluationError::Cancelled`] if the reader was cancelled, or is dropped
    /// here, before the producer ran out of items.
    pub async fn join(self) -> Result<usize, QueryEvaluationError> {
        let Self { receiver, handle, .. } = self;
        drop(receiver);
        handle.await?
    }
}

impl<E> Stream for TripleReader<E> {
    type Item = Result<Triple, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// Runs a blocking triple source, such as a parser, on the blocking thread pool and streams its
/// items through a channel of the given capacity.
///
/// Must be called within a Tokio runtime.
pub fn spawn_triple_reader<P, E>(parser: P, capacity: usize) -> TripleReader<E>
where
    P: Iterator<Item = Result<Triple, E>> + Send + 'static,
    E: Send + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let token = CancellationToken::new();
    let runtime = Handle::current();
    let producer_token = token.clone();
    let handle = tokio::task::spawn_blocking(move || {
        let mut delivered = 0;
        for item in parser {
            if !runtime.block_on(send(&sender, &producer_token, item)) {
                debug!("Triple reader stopped after {delivered} items");
                return Err(QueryEvaluationError::Cancelled);
            }
            delivered += 1;
        }
        Ok(delivered)
    });

    TripleReader {
        receiver,
        handle,
        _guard: token.clone().drop_guard(),
        token,
    }
}
