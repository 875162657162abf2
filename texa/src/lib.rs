// texa — read-only analyses over tensor-expression IR trees
//
// Library root. The IR model and traversal come first; each analysis is a
// visitor built on `visit`.

pub mod buffer_map;
pub mod builder;
pub mod diag;
pub mod has_rand;
pub mod id;
pub mod ir;
pub mod load;
pub mod node_finder;
pub mod printer;
pub mod report;
pub mod var_finder;
pub mod verify;
pub mod visit;
