//! Template engine for custom info
//!
//! A template is literal text with embedded expressions:
//!
//! ```text
//! Speed: {Player.Speed}
//! Dash cooldown: {Player.dashCooldownTimer.toFrame()}
//! Berry: {Strawberry[1a:3].Position=}
//! ```
//!
//! Each expression names a type reference followed by a member chain. The
//! type is looked up in the [`TypeRegistry`], instances are found with the
//! entity locator, the chain is walked by the [`MemberEvaluator`] and the
//! result is rendered by the [`ValueFormatter`].

mod evaluator;
mod format;
mod helpers;
mod locator;
mod parser;
mod registry;

pub use evaluator::{MemberError, MemberEvaluator};
pub use format::{collider_to_string, format_float, format_vector, FormatOptions, MAX_DECIMALS, ValueFormatter};
pub use helpers::{HelperContext, HelperFn, HelperTable, GET_ASSEMBLY, TO_FRAME, TO_PIXEL_PER_FRAME};
pub use locator::{find_cached, find_entities, EntityCache};
pub use parser::{
    parse_expression, parse_template, parse_type_reference, split_call, Annotation, Expression,
    Segment, TypeReference,
};
pub use registry::{ResolvedTypes, TypeRegistry};
