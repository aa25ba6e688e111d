// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0


use std::sync::Arc;

use crate::Node;
use crate::testing::{MemoryBackend, mount_memory};

/// The `users`/`orders` fixture: users holds 1, 2, 3 and orders is empty.
pub(crate) fn users_and_orders() -> (Arc<MemoryBackend>, Node) {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_collection("users", &[1, 2, 3])
            .with_collection("orders", &[]),
    );
    let root = mount_memory(backend.clone());
    (backend, root)
}
