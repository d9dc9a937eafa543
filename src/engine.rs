//! Rendering templates against a host

use std::rc::Rc;

use crate::config::InfoConfig;
use crate::host::{Host, ObjectRef, TypeRef, Value};
use crate::template::{
    find_cached, parse_expression, parse_template, EntityCache, Expression, HelperTable,
    MemberEvaluator, ResolvedTypes, Segment, TypeRegistry, ValueFormatter,
};

/// The custom info engine
///
/// Owns the type registry and the helper table. Call
/// [`rebuild`](Self::rebuild) whenever the host's type universe changes.
#[derive(Debug)]
pub struct InfoEngine {
    config: InfoConfig,
    registry: TypeRegistry,
    helpers: HelperTable,
}

/// Per-expression state shared by every resolved type branch
struct Pass<'a> {
    host: &'a dyn Host,
    evaluator: MemberEvaluator<'a>,
    formatter: ValueFormatter<'a>,
    expression: &'a Expression,
    entity_id: &'a str,
    more_than_one_entity: bool,
}

impl InfoEngine {
    /// Create an engine and index the host's types
    pub fn new(config: InfoConfig, host: &dyn Host) -> Self {
        let mut registry = TypeRegistry::with_aliases(config.aliases.clone());
        registry.rebuild(host);
        Self {
            config,
            registry,
            helpers: HelperTable::new(),
        }
    }

    /// Replace the helper transform table
    pub fn with_helpers(mut self, helpers: HelperTable) -> Self {
        self.helpers = helpers;
        self
    }

    /// Re-index the host's types, dropping cached type resolutions
    pub fn rebuild(&mut self, host: &dyn Host) {
        self.registry.rebuild(host);
    }

    pub fn config(&self) -> &InfoConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn helpers(&self) -> &HelperTable {
        &self.helpers
    }

    /// Render the configured template, e.g. once per displayed frame
    pub fn get_info(&mut self, host: &dyn Host, decimals: Option<usize>) -> String {
        let decimals = decimals.unwrap_or(self.config.decimals);
        let template = self.config.template.clone();
        let mut cache = EntityCache::new();
        self.render_template(host, &template, decimals, &mut cache, false)
    }

    /// Evaluate a single expression typed at a console, e.g. `Player.Speed`
    pub fn run_query(&mut self, host: &dyn Host, expression: &str) -> String {
        let template = format!("{{{}}}", expression);
        let decimals = self.config.decimals;
        let mut cache = EntityCache::new();
        self.render_template(host, &template, decimals, &mut cache, true)
    }

    /// Substitute every expression in `template`; literal text is kept as is.
    ///
    /// `cache` must not outlive the current frame. `interactive` trims the
    /// leading separator of entity results for console output.
    pub fn render_template(
        &mut self,
        host: &dyn Host,
        template: &str,
        decimals: usize,
        cache: &mut EntityCache,
        interactive: bool,
    ) -> String {
        let mut output = String::with_capacity(template.len());
        for segment in parse_template(template) {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Expression(text) => {
                    let rendered = self.render_expression(host, text, decimals, cache, interactive);
                    output.push_str(&rendered);
                }
            }
        }
        output
    }

    /// Resolve a type reference without evaluating anything
    pub fn try_parse_types(&mut self, text: &str) -> Option<ResolvedTypes> {
        self.registry.try_parse_types(text).ok()
    }

    /// First type matching a type reference
    pub fn try_parse_type(&mut self, text: &str) -> Option<TypeRef> {
        self.registry.try_parse_type(text).ok().map(|(ty, _)| ty)
    }

    fn render_expression(
        &mut self,
        host: &dyn Host,
        text: &str,
        decimals: usize,
        cache: &mut EntityCache,
        interactive: bool,
    ) -> String {
        let helpers = &self.helpers;
        let expression = match parse_expression(text, |name| helpers.contains(name)) {
            Ok(expression) => expression,
            Err(err) => return err.to_string(),
        };
        let resolved = match self.registry.try_parse_types(&expression.type_text) {
            Ok(resolved) => resolved,
            Err(err) => {
                // The HUD template renders every frame
                if interactive {
                    log::warn!("custom info expression '{}': {}", text, err);
                } else {
                    log::debug!("custom info expression '{}': {}", text, err);
                }
                return err.to_string();
            }
        };

        let entity_count: usize = resolved
            .types
            .iter()
            .filter(|ty| ty.is_entity())
            .filter_map(|ty| find_cached(host, ty, &resolved.entity_id, cache))
            .map(|found| found.len())
            .sum();

        let pass = Pass {
            host,
            evaluator: MemberEvaluator::new(host, &self.config.precision_overrides),
            formatter: ValueFormatter::new(host, &self.helpers, self.config.format_options(decimals)),
            expression: &expression,
            entity_id: &resolved.entity_id,
            more_than_one_entity: entity_count > 1,
        };

        let mut results: Vec<String> = resolved
            .types
            .iter()
            .map(|ty| pass.render_type(ty, cache))
            .filter(|text| !text.is_empty())
            .collect();

        let entity_first = resolved.types.first().is_some_and(|ty| ty.is_entity());
        let separator = if entity_first { "" } else { " " };
        if interactive && entity_first {
            if let Some(first) = results.first_mut() {
                *first = first.trim_start().to_string();
            }
        }

        format!(
            "{}{}",
            expression.annotation.prefix(&expression.text),
            results.join(separator)
        )
    }
}

impl Pass<'_> {
    fn render_type(&self, ty: &TypeRef, cache: &mut EntityCache) -> String {
        let members = &self.expression.members;
        if members
            .first()
            .is_some_and(|first| self.evaluator.is_static_member(ty, first))
        {
            return self.render_value(ty, None);
        }

        let Some(scene) = self.host.scene() else {
            return instance_not_found(ty);
        };

        if ty.is_entity() {
            return match find_cached(self.host, ty, self.entity_id, cache) {
                Some(entities) => entities
                    .iter()
                    .map(|entity| self.render_entity(ty, entity))
                    .collect(),
                None => instance_not_found(ty),
            };
        }

        if is_type(ty, self.host.scene_type()) {
            return self.render_value(ty, Some(scene));
        }
        if is_type(ty, self.host.session_type()) {
            return match self.host.session() {
                Some(session) => self.render_value(ty, Some(session)),
                None => instance_not_found(ty),
            };
        }
        instance_not_found(ty)
    }

    fn render_entity(&self, ty: &TypeRef, entity: &ObjectRef) -> String {
        let text = self.render_value(ty, Some(Value::Object(Rc::clone(entity))));
        if !self.more_than_one_entity {
            return text;
        }
        match entity.stable_id() {
            Some(id) => format!("\n[{}] {}", id, text),
            None => format!("\n{}", text),
        }
    }

    fn render_value(&self, ty: &TypeRef, instance: Option<Value>) -> String {
        match self
            .evaluator
            .evaluate(ty, instance, &self.expression.members)
        {
            Ok(Some(value)) => self
                .formatter
                .format(&value, self.expression.helper.as_deref()),
            Ok(None) => String::new(),
            Err(err) => err.to_string(),
        }
    }
}

fn is_type(ty: &TypeRef, other: Option<TypeRef>) -> bool {
    other.is_some_and(|other| ty.is(&other))
}

fn instance_not_found(ty: &TypeRef) -> String {
    format!("Instance of {} not found", ty.full_name())
}
