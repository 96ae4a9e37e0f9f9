// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters for concrete scene types.

#[cfg(feature = "box_tree_adapter")]
pub mod box_tree;
