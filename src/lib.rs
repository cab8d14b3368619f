//! Ordered key/value containers with O(1) least-recently-used eviction.
//!
//! Three layers, each usable on its own:
//!
//! - [`LinkedList`]: doubly linked list over an index arena, addressed by
//!   [`NodeId`] handles.
//! - [`ListDictionary`]: string keys mapped to list nodes, so key lookups are
//!   O(1) and entries keep their insertion (or relocation) order.
//! - [`LruCache`]: a bounded [`ListDictionary`] that promotes entries on
//!   `get` and evicts from the least recently used end on `add`.
//!
//! Nothing here is synchronized. Share a cache across threads by putting the
//! whole `LruCache` behind one lock.
//!
//! Memoizing an expensive artifact keyed by its source text:
//!
//! ```
//! use std::rc::Rc;
//! use ordcache::LruCache;
//!
//! fn compile(source: &str) -> Rc<Vec<String>> {
//!     Rc::new(source.split_whitespace().map(str::to_owned).collect())
//! }
//!
//! let mut compiled: LruCache<Rc<Vec<String>>> = LruCache::new(128)?;
//! let source = "a + b * 2";
//! let program = match compiled.get(source).cloned() {
//!     Some(hit) => hit,
//!     None => {
//!         let fresh = compile(source);
//!         compiled.add(source, Rc::clone(&fresh));
//!         fresh
//!     }
//! };
//! assert_eq!(program.len(), 5);
//! assert_eq!(compiled.len(), 1);
//! # Ok::<(), ordcache::Error>(())
//! ```
//!
//! Keys are always strings; anything else is rejected at compile time.
//!
//! ```compile_fail
//! let mut cache = ordcache::LruCache::<&str>::new(4).unwrap();
//! cache.add(123, "val");
//! ```
//!
//! ```compile_fail
//! let mut cache = ordcache::LruCache::<&str>::new(4).unwrap();
//! cache.add(None::<String>, "val");
//! ```
//!
//! ```compile_fail
//! let mut cache = ordcache::LruCache::<&str>::new(4).unwrap();
//! cache.get(true);
//! ```
//!
//! ```compile_fail
//! let mut cache = ordcache::LruCache::<&str>::new(4).unwrap();
//! cache.remove(&());
//! ```
//!
//! ```compile_fail
//! let mut dict = ordcache::ListDictionary::<&str>::new();
//! dict.add(123, "val", ordcache::Position::Last);
//! ```
//!
//! ```compile_fail
//! let dict = ordcache::ListDictionary::<&str>::new();
//! dict.get(true);
//! ```
//!
//! ```compile_fail
//! let mut dict = ordcache::ListDictionary::<&str>::new();
//! dict.remove(&());
//! ```

mod error;
mod linked_list;
mod list_dict;
mod lru;

pub use error::{Error, Result};
pub use linked_list::{Iter, LinkedList, NodeId, Position};
pub use list_dict::ListDictionary;
pub use lru::{CacheStats, LruCache, LruOptions};
