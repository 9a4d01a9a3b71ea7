//! Fragment combinators: repeated builds, packing and chaining.

use crate::build::{build, DomError};
use crate::node::{Element, Fragment, Node};
use crate::options::Options;

/// Build one element and bundle `count` independent copies of it.
///
/// The tag is validated even when `count` is zero.
pub fn multibuild(tag: &str, count: usize, options: Options) -> Result<Fragment, DomError> {
    let template = build(tag, options)?;
    Ok((0..count)
        .map(|_| Node::Element(template.clone()))
        .collect())
}

/// Bundle nodes into a fragment, keeping their order.
///
/// Accepts a vector, an array, or any iterator of nodes. See [`pack!`] for
/// the variadic form.
///
/// [`pack!`]: crate::pack!
pub fn pack<I, N>(items: I) -> Fragment
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    items.into_iter().map(Into::into).collect()
}

/// Nest each element as the child of the one before it.
///
/// The first element becomes the root and the last the deepest leaf. The
/// returned fragment holds only the root.
pub fn chain<I>(items: I) -> Fragment
where
    I: IntoIterator<Item = Element>,
{
    let mut items: Vec<Element> = items.into_iter().collect();

    let Some(mut current) = items.pop() else {
        return Fragment::new();
    };

    while let Some(mut parent) = items.pop() {
        parent.append(current);
        current = parent;
    }

    Fragment::from(vec![Node::Element(current)])
}

/// Variadic [`pack`]: `pack![a, b]` is the same as `pack(vec![a, b])`.
#[macro_export]
macro_rules! pack {
    ($($item:expr),* $(,)?) => {
        $crate::pack(::std::vec::Vec::<$crate::Node>::from([$($crate::Node::from($item)),*]))
    };
}

/// Variadic [`chain`]: `chain![a, b, c]` nests `c` in `b` in `a`.
#[macro_export]
macro_rules! chain {
    ($($item:expr),* $(,)?) => {
        $crate::chain(::std::vec::Vec::<$crate::Element>::from([$($item),*]))
    };
}
