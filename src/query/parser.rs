//! Path language parser
//!
//! Hand-written cursor parser for scripts, statements, step chains and
//! bracketed predicates.

use crate::error::{Error, Result};
use crate::query::ast::*;
use crate::types::PropertyValue;

/// Cursor over one statement, step token or predicate.
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse one statement: `<var> := <expr>` or a bare `<expr>`.
    pub fn parse_statement(&mut self, line: usize) -> Result<Statement> {
        self.skip_whitespace();
        let start = self.pos;

        let mut target = None;
        if self.peek_char_is('$') {
            let name = self.parse_variable()?;
            self.skip_whitespace();
            if self.try_str(":=") {
                target = Some(name);
                self.skip_whitespace();
            } else {
                // Bare variable expression, re-read it as the source
                self.pos = start;
            }
        }

        let expr = self.parse_expr()?;

        self.skip_whitespace();
        if !self.at_end() {
            return Err(Error::step_syntax(
                self.token_from(self.pos),
                format!("unexpected `{}`", self.rest()),
            ));
        }

        Ok(Statement {
            line,
            text: self.input.trim().to_string(),
            target,
            expr,
        })
    }

    /// expr: relativeChain | source filter? ('/' step)*
    fn parse_expr(&mut self) -> Result<Expr> {
        if self.try_str("./") {
            let first = self.parse_step(self.pos - 2)?;
            let mut steps = vec![first];
            steps.extend(self.parse_chain()?);
            return Ok(Expr {
                source: Source::Context,
                filter: None,
                steps,
            });
        }

        let source = if self.peek_char_is('$') {
            Source::Variable(self.parse_variable()?)
        } else if self.try_str("g:id(") {
            Source::Lookup(self.parse_lookup_id()?)
        } else if self.at_end() {
            return Err(Error::step_syntax(self.input.trim(), "missing expression"));
        } else {
            return Err(Error::step_syntax(
                self.token_from(self.pos),
                "expected `./`, a variable or `g:id(...)`",
            ));
        };

        let filter = if self.peek_char_is('[') {
            Some(self.parse_filter()?)
        } else {
            None
        };
        let steps = self.parse_chain()?;

        Ok(Expr {
            source,
            filter,
            steps,
        })
    }

    fn parse_chain(&mut self) -> Result<Vec<Step>> {
        let mut steps = Vec::new();
        while self.peek_char_is('/') {
            let start = self.pos;
            self.pos += 1;
            steps.push(self.parse_step(start)?);
        }
        Ok(steps)
    }

    /// step: ident filter?  (the `./` or `/` separator is already consumed)
    fn parse_step(&mut self, start: usize) -> Result<Step> {
        let name = self.parse_identifier().ok_or_else(|| {
            Error::step_syntax(self.token_from(start), "missing navigation identifier")
        })?;

        let predicate = if self.peek_char_is('[') {
            Some(self.parse_filter()?)
        } else {
            None
        };

        let target = match BuiltinStep::from_name(&name) {
            Some(kind) => StepTarget::Builtin(kind),
            None => StepTarget::UserPath(name),
        };

        Ok(Step {
            target,
            predicate,
            token: self.input[start..self.pos].to_string(),
        })
    }

    /// Parse `[ ... ]` at the cursor. The closing bracket is found first, so
    /// the predicate is parsed from exactly the bracket contents.
    fn parse_filter(&mut self) -> Result<Predicate> {
        let open = self.pos;
        self.pos += 1;

        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (offset, c) in self.input[self.pos..].char_indices() {
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
                '\'' | '"' => quote = Some(c),
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = &self.input[self.pos..self.pos + offset];
                        self.pos += offset + 1;
                        return PathParser::new(inner).parse_predicate();
                    }
                }
                _ => {}
            }
        }

        Err(Error::predicate_syntax(&self.input[open..], "unclosed `[`"))
    }

    fn parse_variable(&mut self) -> Result<String> {
        let start = self.pos;
        self.pos += 1; // '$'
        self.parse_identifier().ok_or_else(|| {
            Error::step_syntax(self.token_from(start), "expected variable name after `$`")
        })
    }

    /// `g:id(` has been consumed; parse `<literal>)`.
    fn parse_lookup_id(&mut self) -> Result<String> {
        let start = self.pos;
        self.skip_whitespace();
        let id = match self.peek_char() {
            Some('\'') | Some('"') => self
                .parse_string()
                .map_err(|reason| Error::step_syntax(self.token_from(start), reason))?,
            Some(c) if c.is_ascii_digit() || c == '-' => match self.parse_number() {
                Ok(PropertyValue::Integer(n)) => n.to_string(),
                Ok(other) => other.to_string(),
                Err(reason) => return Err(Error::step_syntax(self.token_from(start), reason)),
            },
            _ => {
                return Err(Error::step_syntax(
                    self.token_from(start),
                    "g:id expects a quoted string or a number",
                ))
            }
        };
        self.skip_whitespace();
        if !self.try_str(")") {
            return Err(Error::step_syntax(self.token_from(start), "expected `)`"));
        }
        Ok(id)
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// Parse a complete predicate: the whole input must be consumed.
    pub fn parse_predicate(&mut self) -> Result<Predicate> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.predicate_error("empty predicate"));
        }

        let predicate = self.parse_or()?;

        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.predicate_error(format!("unexpected `{}`", self.rest())));
        }
        Ok(predicate)
    }

    fn parse_or(&mut self) -> Result<Predicate> {
        let mut left = self.parse_and()?;

        while self.try_keyword("or") {
            let right = self.parse_and()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Predicate> {
        let mut left = self.parse_primary()?;

        while self.try_keyword("and") {
            let right = self.parse_primary()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Predicate> {
        self.skip_whitespace();

        // Parenthesized group
        if self.try_str("(") {
            let inner = self.parse_or()?;
            self.skip_whitespace();
            if !self.try_str(")") {
                return Err(self.predicate_error("expected `)`"));
            }
            return Ok(inner);
        }

        let left = self.parse_operand()?;
        self.skip_whitespace();
        let op = self.parse_compare_op().ok_or_else(|| {
            self.predicate_error(format!("expected comparison operator after `{}`", left))
        })?;
        let right = self.parse_operand()?;

        Ok(Predicate::Compare(left, op, right))
    }

    fn parse_compare_op(&mut self) -> Option<CompareOp> {
        if self.try_str("!=") {
            Some(CompareOp::Ne)
        } else if self.try_str(">=") {
            Some(CompareOp::Ge)
        } else if self.try_str("<=") {
            Some(CompareOp::Le)
        } else if self.try_str(">") {
            Some(CompareOp::Gt)
        } else if self.try_str("<") {
            Some(CompareOp::Lt)
        } else if self.try_str("=") {
            Some(CompareOp::Eq)
        } else {
            None
        }
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('@') => {
                self.pos += 1;
                let name = self
                    .parse_identifier()
                    .ok_or_else(|| self.predicate_error("expected property name after `@`"))?;
                Ok(match name.as_str() {
                    "label" => Operand::Label,
                    "id" => Operand::Id,
                    _ => Operand::Property(name),
                })
            }
            Some('\'') | Some('"') => self
                .parse_string()
                .map(|s| Operand::Literal(PropertyValue::String(s)))
                .map_err(|reason| self.predicate_error(reason)),
            Some(c) if c.is_ascii_digit() || c == '-' => self
                .parse_number()
                .map(Operand::Literal)
                .map_err(|reason| self.predicate_error(reason)),
            Some(_) if self.try_keyword("true") => {
                Ok(Operand::Literal(PropertyValue::Boolean(true)))
            }
            Some(_) if self.try_keyword("false") => {
                Ok(Operand::Literal(PropertyValue::Boolean(false)))
            }
            Some(c) => Err(self.predicate_error(format!("unexpected `{}`", c))),
            None => Err(self.predicate_error("unexpected end of predicate")),
        }
    }

    fn predicate_error(&self, reason: impl Into<String>) -> Error {
        Error::predicate_syntax(self.input, reason)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_is(&self, c: char) -> bool {
        self.peek_char() == Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// The whitespace-delimited token starting at `start`, for error messages.
    fn token_from(&self, start: usize) -> &'a str {
        let rest = &self.input[start..];
        rest.split_whitespace().next().unwrap_or(rest)
    }

    fn try_str(&mut self, s: &str) -> bool {
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn try_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let len = keyword.len();
        let Some(slice) = self.input.get(self.pos..self.pos + len) else {
            return false;
        };
        if !slice.eq_ignore_ascii_case(keyword) {
            return false;
        }
        // Ensure not followed by identifier char
        match self.input[self.pos + len..].chars().next() {
            Some(next) if next.is_alphanumeric() || next == '_' => false,
            _ => {
                self.pos += len;
                true
            }
        }
    }

    fn parse_identifier(&mut self) -> Option<String> {
        let start = self.pos;

        match self.peek_char() {
            Some(c) if c.is_alphabetic() || c == '_' => self.pos += c.len_utf8(),
            _ => return None,
        }

        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }

        Some(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> std::result::Result<String, String> {
        let quote = match self.peek_char() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err("expected string quote".to_string()),
        };
        self.pos += 1;

        let mut result = String::new();
        while let Some(c) = self.peek_char() {
            if c == quote {
                self.pos += 1;
                return Ok(result);
            } else if c == '\\' {
                self.pos += 1;
                if let Some(escaped) = self.peek_char() {
                    self.pos += escaped.len_utf8();
                    match escaped {
                        'n' => result.push('\n'),
                        't' => result.push('\t'),
                        'r' => result.push('\r'),
                        _ => result.push(escaped),
                    }
                }
            } else {
                self.pos += c.len_utf8();
                result.push(c);
            }
        }

        Err("unclosed string".to_string())
    }

    fn eat_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn next_is_digit(&self, offset: usize) -> bool {
        self.input[self.pos..]
            .chars()
            .nth(offset)
            .map_or(false, |c| c.is_ascii_digit())
    }

    /// number: '-'? digits ('.' digits)? (('e'|'E') ('+'|'-')? digits)?
    fn parse_number(&mut self) -> std::result::Result<PropertyValue, String> {
        let start = self.pos;
        if self.peek_char_is('-') {
            self.pos += 1;
        }

        let digits = self.pos;
        self.eat_digits();
        if self.pos == digits {
            return Err("expected number".to_string());
        }

        let mut is_float = false;
        if self.peek_char_is('.') && self.next_is_digit(1) {
            self.pos += 1;
            self.eat_digits();
            is_float = true;
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let sign = matches!(self.input[self.pos..].chars().nth(1), Some('+' | '-'));
            let offset = if sign { 2 } else { 1 };
            if self.next_is_digit(offset) {
                self.pos += offset;
                self.eat_digits();
                is_float = true;
            }
        }

        let text = &self.input[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(PropertyValue::Float)
                .map_err(|_| format!("invalid number `{}`", text))
        } else {
            text.parse::<i64>()
                .map(PropertyValue::Integer)
                .or_else(|_| text.parse::<f64>().map(PropertyValue::Float))
                .map_err(|_| format!("invalid number `{}`", text))
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a standalone step token such as `./outE[@label='knows']`.
pub fn parse_step(token: &str) -> Result<Step> {
    let trimmed = token.trim();
    let mut parser = PathParser::new(trimmed);
    if !parser.try_str("./") {
        return Err(Error::step_syntax(trimmed, "a step must start with `./`"));
    }
    let step = parser.parse_step(0)?;
    if !parser.at_end() {
        return Err(Error::step_syntax(
            trimmed,
            format!("unexpected `{}`", parser.rest()),
        ));
    }
    Ok(step)
}

/// Parse the contents of a `[ ... ]` filter.
pub fn parse_predicate(text: &str) -> Result<Predicate> {
    PathParser::new(text).parse_predicate()
}

/// Returns the path name if `line` opens a `path <name>` block.
pub fn path_header(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("path")?;
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Split a script into `path … end` blocks and body statements, parsing
/// every statement. Nothing is registered or executed here.
pub fn parse_script(script: &str) -> Result<Script> {
    let mut parsed = Script::default();
    let mut open: Option<PathDefinition> = None;

    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();

        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        if text == "end" {
            match open.take() {
                Some(definition) => parsed.paths.push(definition),
                None => {
                    return Err(Error::ScriptSyntax {
                        line,
                        reason: "`end` without a matching `path`".to_string(),
                    })
                }
            }
            continue;
        }

        if let Some(name) = path_header(text) {
            if let Some(definition) = &open {
                return Err(Error::ScriptSyntax {
                    line,
                    reason: format!("`path` inside the body of path `{}`", definition.name),
                });
            }
            if name.is_empty() {
                return Err(Error::ScriptSyntax {
                    line,
                    reason: "missing path name".to_string(),
                });
            }
            if !is_identifier(name) {
                return Err(Error::ScriptSyntax {
                    line,
                    reason: format!("invalid path name `{}`", name),
                });
            }
            // Rejected at the header, before anything in the body is parsed
            if is_reserved(name) {
                return Err(Error::ReservedName(name.to_string()));
            }
            open = Some(PathDefinition {
                name: name.to_string(),
                line,
                body: Vec::new(),
            });
            continue;
        }

        let statement = PathParser::new(text)
            .parse_statement(line)
            .map_err(|err| Error::Statement {
                line,
                text: text.to_string(),
                source: Box::new(err),
            })?;
        match open.as_mut() {
            Some(definition) => definition.body.push(statement),
            None => parsed.body.push(statement),
        }
    }

    if let Some(definition) = open {
        return Err(Error::ScriptSyntax {
            line: definition.line,
            reason: format!("path `{}` is missing `end`", definition.name),
        });
    }

    Ok(parsed)
}
