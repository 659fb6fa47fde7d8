//! Static export index for JavaScript and TypeScript modules.
//!
//! The index answers "does this module export `name`, and can it be called?"
//! without running the module. It is built from the source text with a fixed
//! set of regular expressions covering the export forms that Nx plugins and
//! their compiled output actually use:
//!
//! | Form | Example | Shape |
//! |------|---------|-------|
//! | function declaration | `export async function gen() {}` | callable |
//! | class declaration | `export class Builder {}` | callable |
//! | variable | `export const run = (tree) => {}` | from initializer |
//! | default | `export default createGenerator` | from binding |
//! | export list | `export { gen as default }` | from binding |
//! | named re-export | `export { gen } from './gen'` | followed |
//! | star re-export | `export * from './gen'` | followed |
//! | CommonJS | `exports.gen = gen;` | from binding |
//! | CommonJS object | `module.exports = { gen, schema: {} }` | per member |
//! | other CommonJS write | `exports["gen"] = gen`, mid-line `exports.gen=gen` | opaque |
//! | getter re-export | `Object.defineProperty(exports, "gen", ...)` | opaque |
//! | tslib helper | `tslib_1.__exportStar(require("./gen"), exports)` | followed |
//!
//! Initializers are classified as *callable* (function or class expressions,
//! arrow functions), *value* (object, array, string, number, boolean, `null`,
//! `undefined`, `new` expressions) or *opaque* (anything else, such as a call
//! result or an imported binding). Opaque exports are accepted: the index can
//! prove an export is missing or is definitely not a function, never more.
//!
//! TypeScript-only exports (`export type`, `export interface`,
//! `export declare`) have no runtime value and are not indexed. CommonJS
//! `exports.x = void 0;` placeholders emitted by `tsc` are ignored.

use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// What is known about one exported binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportShape {
    /// A function or class.
    Callable,
    /// A definitely non-callable value.
    Value,
    /// Exists, but its runtime value cannot be determined statically.
    Opaque,
}

impl ExportShape {
    /// Whether an implementation may point at this export.
    #[must_use]
    pub fn is_callable(self) -> bool {
        !matches!(self, Self::Value)
    }
}

/// One entry of an [`ExportIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// Defined in this module.
    Local(ExportShape),
    /// Forwarded from another module.
    ReExport {
        /// Module request, relative to the re-exporting module
        request: String,
        /// Export name inside the target module
        name: String,
    },
}

/// Exports of a single module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportIndex {
    named: BTreeMap<String, ExportEntry>,
    star_requests: Vec<String>,
    dynamic: bool,
}

impl ExportIndex {
    /// Index of a JSON module: every top-level key is a non-callable value.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let named = match value {
            Value::Object(map) => {
                map.keys().map(|k| (k.clone(), ExportEntry::Local(ExportShape::Value))).collect()
            }
            _ => BTreeMap::new(),
        };
        Self {
            named,
            ..Default::default()
        }
    }

    /// The entry exported as `name`, if this module declares it itself.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ExportEntry> {
        self.named.get(name)
    }

    /// Requests of `export * from` style re-exports, in source order.
    #[must_use]
    pub fn star_requests(&self) -> &[String] {
        &self.star_requests
    }

    /// True when `module.exports` is replaced by something the index cannot
    /// see into; every name must then be treated as opaque.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Names this module exports directly or by named re-export.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }
}

/// What a binding refers to before aliases are followed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    Shape(ExportShape),
    Alias(String),
}

const MAX_ALIAS_DEPTH: usize = 8;

/// Compiled patterns used to build an [`ExportIndex`] from source text.
#[derive(Debug, Clone)]
pub struct ExportScanner {
    block_comment: Regex,
    line_comment: Regex,
    function_decl: Regex,
    class_decl: Regex,
    variable_decl: Regex,
    default_expr: Regex,
    export_list: Regex,
    export_star: Regex,
    commonjs_chain: Regex,
    commonjs_name: Regex,
    commonjs_write: Regex,
    define_property: Regex,
    star_helper: Regex,
    module_exports: Regex,
    callable_expr: Regex,
    arrow_expr: Regex,
    identifier: Regex,
    alias_item: Regex,
    object_method: Regex,
    object_accessor: Regex,
    object_property: Regex,
}

impl ExportScanner {
    /// Compiles the export patterns.
    ///
    /// # Errors
    ///
    /// Only if a pattern fails to compile, which indicates a programming error.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            block_comment: Regex::new(r"(?s)/\*.*?\*/")?,
            line_comment: Regex::new(r"(?m)^[ \t]*//.*$")?,
            function_decl: Regex::new(
                r"(?m)^[ \t]*(export[ \t]+(?:default[ \t]+)?)?(?:async[ \t]+)?function\b[ \t]*\*?[ \t]*([A-Za-z_$][\w$]*)?",
            )?,
            class_decl: Regex::new(
                r"(?m)^[ \t]*(export[ \t]+(?:default[ \t]+)?)?(?:abstract[ \t]+)?class\b[ \t]*([A-Za-z_$][\w$]*)?",
            )?,
            variable_decl: Regex::new(
                r"(?m)^[ \t]*(export[ \t]+)?(?:const|let|var)[ \t]+([A-Za-z_$][\w$]*)[ \t]*(?::[^=\n]*)?=[ \t]*([^\n]*)$",
            )?,
            default_expr: Regex::new(r"(?m)^[ \t]*export[ \t]+default[ \t]+([^\n]*)$")?,
            export_list: Regex::new(
                r#"(?m)^[ \t]*export[ \t]*(type[ \t]*)?\{([^}]*)\}(?:[ \t]*from[ \t]*['"]([^'"]+)['"])?"#,
            )?,
            export_star: Regex::new(
                r#"(?m)^[ \t]*export[ \t]*\*[ \t]*(?:as[ \t]+([A-Za-z_$][\w$]*)[ \t]*)?from[ \t]*['"]([^'"]+)['"]"#,
            )?,
            commonjs_chain: Regex::new(
                r"(?m)^[ \t]*((?:(?:module\.)?exports\.[A-Za-z_$][\w$]*[ \t]*=[ \t]*)+)([^\n]*)$",
            )?,
            commonjs_name: Regex::new(r"exports\.([A-Za-z_$][\w$]*)")?,
            commonjs_write: Regex::new(
                r#"\bexports\s*(?:\.\s*([A-Za-z_$][\w$]*)|\[\s*['"]([^'"]+)['"]\s*\])\s*=(?:\s*(?:(?:module\.)?exports\s*(?:\.\s*[A-Za-z_$][\w$]*|\[\s*['"][^'"]+['"]\s*\])\s*=\s*)*(void\s+0\b)|[^=]|$)"#,
            )?,
            define_property: Regex::new(
                r#"Object\.defineProperty\(\s*(?:module\.)?exports\s*,\s*['"]([^'"]+)['"]"#,
            )?,
            star_helper: Regex::new(r#"__export(?:Star)?\(\s*require\(\s*['"]([^'"]+)['"]\s*\)"#)?,
            module_exports: Regex::new(r"(?m)^[ \t]*(?:module\.exports|export)[ \t]*=[ \t]*([^\n]*)$")?,
            callable_expr: Regex::new(r"^(?:async[ \t]+)?(?:function\b|class\b)")?,
            arrow_expr: Regex::new(
                r"^(?:async[ \t]*)?(?:<[^>]*>[ \t]*)?(?:\([^()]*\)|[A-Za-z_$][\w$]*)[ \t]*(?::[^=]*)?=>",
            )?,
            identifier: Regex::new(r"^[A-Za-z_$][\w$]*$")?,
            alias_item: Regex::new(r"^([A-Za-z_$][\w$]*)(?:\s+as\s+([A-Za-z_$][\w$]*))?$")?,
            object_method: Regex::new(r"^(?:async\s+)?\*?\s*([A-Za-z_$][\w$]*)\s*\(")?,
            object_accessor: Regex::new(r"^(?:get|set)\s+([A-Za-z_$][\w$]*)\s*\(")?,
            object_property: Regex::new(r#"(?s)^(?:([A-Za-z_$][\w$]*)|['"]([^'"]+)['"])\s*:\s*(.*)$"#)?,
        })
    }

    /// Builds the export index of a JavaScript or TypeScript source file.
    #[must_use]
    pub fn scan(&self, source: &str) -> ExportIndex {
        let source = self.block_comment.replace_all(source, " ");
        let source = self.line_comment.replace_all(&source, "");

        let mut locals: HashMap<String, Binding> = HashMap::new();
        let mut exported: BTreeMap<String, Binding> = BTreeMap::new();
        let mut index = ExportIndex::default();

        for caps in self.function_decl.captures_iter(&source) {
            record_declaration(&caps, &mut locals, &mut exported);
        }
        for caps in self.class_decl.captures_iter(&source) {
            record_declaration(&caps, &mut locals, &mut exported);
        }

        for caps in self.variable_decl.captures_iter(&source) {
            let name = caps[2].to_string();
            let binding = self.classify(&caps[3]);
            if caps.get(1).is_some() {
                exported.insert(name.clone(), binding.clone());
            }
            locals.insert(name, binding);
        }

        for caps in self.default_expr.captures_iter(&source) {
            let expr = caps[1].trim();
            if self.callable_expr.is_match(expr) {
                // Declarations are recorded above.
                continue;
            }
            exported.insert("default".to_string(), self.classify(expr));
        }

        for caps in self.export_list.captures_iter(&source) {
            if caps.get(1).is_some() {
                continue;
            }
            let from = caps.get(3).map(|m| m.as_str().to_string());
            for item in caps[2].split(',').map(str::trim).filter(|i| !i.is_empty()) {
                if item.starts_with("type ") {
                    continue;
                }
                let Some(item) = self.alias_item.captures(item) else {
                    continue;
                };
                let local = item[1].to_string();
                let public = item.get(2).map_or_else(|| local.clone(), |m| m.as_str().to_string());
                match &from {
                    Some(request) => {
                        exported.remove(&public);
                        index.named.insert(
                            public,
                            ExportEntry::ReExport {
                                request: request.clone(),
                                name: local,
                            },
                        );
                    }
                    None => {
                        exported.insert(public, Binding::Alias(local));
                    }
                }
            }
        }

        for caps in self.export_star.captures_iter(&source) {
            match caps.get(1) {
                Some(namespace) => {
                    exported.insert(namespace.as_str().to_string(), Binding::Shape(ExportShape::Value));
                }
                None => index.star_requests.push(caps[2].to_string()),
            }
        }

        for caps in self.commonjs_chain.captures_iter(&source) {
            let rhs = caps[2].trim().trim_end_matches(';').trim_end();
            if rhs == "void 0" {
                continue;
            }
            let binding = self.classify(rhs);
            for name in self.commonjs_name.captures_iter(&caps[1]) {
                exported.insert(name[1].to_string(), binding.clone());
            }
        }

        // Writes the line-based forms above cannot classify still prove the
        // name exists.
        for caps in self.commonjs_write.captures_iter(&source) {
            if caps.get(3).is_some() {
                continue;
            }
            let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            exported
                .entry(name.as_str().to_string())
                .or_insert(Binding::Shape(ExportShape::Opaque));
        }

        for caps in self.define_property.captures_iter(&source) {
            if &caps[1] != "__esModule" {
                exported.insert(caps[1].to_string(), Binding::Shape(ExportShape::Opaque));
            }
        }

        for caps in self.star_helper.captures_iter(&source) {
            index.star_requests.push(caps[1].to_string());
        }

        for caps in self.module_exports.captures_iter(&source) {
            let rhs = caps[1].trim();
            if !rhs.starts_with('{') {
                index.dynamic = true;
                continue;
            }
            let Some(start) = caps.get(1).map(|m| m.start()) else {
                continue;
            };
            match balanced_block(&source, start) {
                Some(body) => {
                    for member in split_top_level(body) {
                        match self.object_member(member) {
                            Some((name, binding)) => {
                                exported.insert(name, binding);
                            }
                            None => index.dynamic = true,
                        }
                    }
                }
                None => index.dynamic = true,
            }
        }

        for (name, binding) in exported {
            let shape = resolve_binding(&binding, &locals);
            index.named.entry(name).or_insert(ExportEntry::Local(shape));
        }

        index
    }

    fn classify(&self, expr: &str) -> Binding {
        let expr = expr.trim().trim_end_matches(';').trim_end();

        if self.callable_expr.is_match(expr) || self.arrow_expr.is_match(expr) {
            return Binding::Shape(ExportShape::Callable);
        }
        if self.identifier.is_match(expr) {
            return match expr {
                "true" | "false" | "null" | "undefined" => Binding::Shape(ExportShape::Value),
                _ => Binding::Alias(expr.to_string()),
            };
        }

        let value_like = expr.starts_with(['{', '[', '"', '\'', '`'])
            || expr.starts_with(|c: char| c.is_ascii_digit())
            || expr.starts_with("new ")
            || expr.starts_with("void ")
            || expr.starts_with('-');
        if value_like {
            Binding::Shape(ExportShape::Value)
        } else {
            Binding::Shape(ExportShape::Opaque)
        }
    }

    fn object_member(&self, member: &str) -> Option<(String, Binding)> {
        if member.starts_with("...") {
            return None;
        }
        if let Some(caps) = self.object_accessor.captures(member) {
            return Some((caps[1].to_string(), Binding::Shape(ExportShape::Opaque)));
        }
        if let Some(caps) = self.object_method.captures(member) {
            return Some((caps[1].to_string(), Binding::Shape(ExportShape::Callable)));
        }
        if let Some(caps) = self.object_property.captures(member) {
            let key = caps.get(1).or_else(|| caps.get(2))?.as_str().to_string();
            return Some((key, self.classify(&caps[3])));
        }
        if self.identifier.is_match(member) {
            return Some((member.to_string(), Binding::Alias(member.to_string())));
        }
        None
    }
}

fn record_declaration(
    caps: &regex::Captures<'_>,
    locals: &mut HashMap<String, Binding>,
    exported: &mut BTreeMap<String, Binding>,
) {
    let name = caps.get(2).map(|m| m.as_str().to_string());
    if let Some(name) = &name {
        locals.insert(name.clone(), Binding::Shape(ExportShape::Callable));
    }
    match caps.get(1).map(|m| m.as_str()) {
        Some(prefix) if prefix.contains("default") => {
            exported.insert("default".to_string(), Binding::Shape(ExportShape::Callable));
        }
        Some(_) => {
            if let Some(name) = name {
                exported.insert(name, Binding::Shape(ExportShape::Callable));
            }
        }
        None => {}
    }
}

fn resolve_binding(binding: &Binding, locals: &HashMap<String, Binding>) -> ExportShape {
    let mut current = binding;
    for _ in 0..MAX_ALIAS_DEPTH {
        match current {
            Binding::Shape(shape) => return *shape,
            Binding::Alias(name) => match locals.get(name) {
                Some(next) => current = next,
                // Imported or otherwise unknown binding.
                None => return ExportShape::Opaque,
            },
        }
    }
    ExportShape::Opaque
}

/// Content between the first `{` at or after `from` and its matching `}`.
fn balanced_block(source: &str, from: usize) -> Option<&str> {
    let open = from + source.get(from..)?.find('{')?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in source[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return source.get(open + 1..open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits an object body on commas that are not nested in brackets or quotes.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(body[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}
