#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! triplestream is a streaming RDF toolkit.
//!
//! It parses [Turtle](https://www.w3.org/TR/turtle/) and
//! [N-Triples](https://www.w3.org/TR/n-triples/) documents into triples, stores them in a
//! [`Graph`](common::Graph) and evaluates basic graph patterns (conjunctions of triple patterns)
//! against it.
//!
//! The entry point is the [`Store`](store::Store):
//! ```
//! use futures::TryStreamExt;
//! use triplestream::store::Store;
//!
//! # tokio_test::block_on(async {
//! let store = Store::new();
//! store
//!     .load_turtle(
//!         "@prefix ex: <http://example.com/> .\nex:Tom ex:age 22 ; ex:knows ex:Ann .\nex:Ann ex:age 30 ."
//!             .as_bytes(),
//!     )
//!     .await?;
//!
//! let groups = store
//!     .query_str("?x ex:knows ?y . ?y ex:age ?age .")?
//!     .try_collect::<Vec<_>>()
//!     .await?;
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].to_string(), "{age: \"30\"^^<http://www.w3.org/2001/XMLSchema#integer>, x: <http://example.com/Tom>, y: <http://example.com/Ann>}");
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! # }).unwrap();
//! ```

pub mod error;
pub mod io;
pub mod store;

pub mod model {
    pub use triplestream_model::*;
}

pub mod parser {
    pub use triplestream_parser::*;
}

pub mod common {
    pub use triplestream_common::*;
}

pub mod execution {
    pub use triplestream_execution::*;
}

pub mod storage {
    pub use triplestream_storage::*;
}
