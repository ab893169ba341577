// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A one-line conditional expression.  `cargo fmt` spreads an `if` over
/// five lines, which buries the edge-of-image rules in the seam finder;
/// `cq!(x == 0, 0, x - 1)` keeps a whole neighbour range on one line.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $when_true: expr, $when_false: expr) => {
        if $condition {
            $when_true
        } else {
            $when_false
        }
    };
}
