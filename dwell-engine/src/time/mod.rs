// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Time as seen by the scheduler and its tasks.

pub mod clock;
