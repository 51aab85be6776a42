// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Typed views over syntax nodes.
//!
//! Each view wraps a [`SyntaxNode`] of one kind and exposes its children by
//! role. Views are free to create and never own data of their own: every
//! accessor walks the underlying node. Accessors return `Option` because
//! recovery can leave any part of a construct missing; a missing token is
//! still returned (as a zero-width token with [`SyntaxToken::is_missing`]),
//! while a missing expression shows up as [`Expression::Error`].
//!
//! # Example
//!
//! ```
//! use moonlit_syntax::source_analysis::ParseOptions;
//! use moonlit_syntax::syntax::SyntaxTree;
//! use moonlit_syntax::syntax::ast::{Expression, LiteralValue, Statement};
//!
//! let tree = SyntaxTree::parse("local x = 42", &ParseOptions::default());
//! let statement = tree.chunk().block().unwrap().statements().next().unwrap();
//! let Statement::LocalVariable(local) = statement else { panic!() };
//! let names: Vec<_> = local.names().map(|n| n.name().unwrap().text().to_string()).collect();
//! assert_eq!(names, ["x"]);
//! let Some(Expression::Literal(value)) = local.values().next() else { panic!() };
//! assert_eq!(value.value(), Some(LiteralValue::Integer(42)));
//! ```

use ecow::EcoVec;

use super::{SyntaxKind, SyntaxNode, SyntaxToken};
use crate::source_analysis::{TokenKind, TokenValue};

/// A typed view over a [`SyntaxNode`].
pub trait AstNode: Sized {
    /// Returns `true` if a node of `kind` can be viewed as `Self`.
    fn can_cast(kind: SyntaxKind) -> bool;

    /// Wraps `node` if its kind matches.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Returns the underlying node.
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident) => {
        ast_node!($(#[$meta])* $name => $name);
    };
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($node:ident)),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = concat!("A [`", stringify!($node), "`].")]
                $variant($node),
            )*
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                $( $node::can_cast(kind) )||*
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                let kind = node.kind();
                $(
                    if $node::can_cast(kind) {
                        return Some(Self::$variant($node(node)));
                    }
                )*
                None
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $( Self::$variant(it) => it.syntax(), )*
                }
            }
        }
    };
}

// ============================================================================
// Helpers
// ============================================================================

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

fn token(parent: &SyntaxNode, kind: TokenKind) -> Option<SyntaxToken> {
    parent.token_of_kind(kind)
}

fn nth_token(parent: &SyntaxNode, kind: TokenKind, n: usize) -> Option<SyntaxToken> {
    parent
        .child_tokens()
        .filter(|token| token.kind() == kind)
        .nth(n)
}

fn nth_expression(parent: &SyntaxNode, n: usize) -> Option<Expression> {
    children::<Expression>(parent).nth(n)
}

// ============================================================================
// Structure
// ============================================================================

ast_node!(
    /// The root of every tree.
    Chunk
);

impl Chunk {
    pub(super) fn from_root(root: SyntaxNode) -> Self {
        debug_assert_eq!(root.kind(), SyntaxKind::Chunk);
        Self(root)
    }

    /// Returns the top-level block.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }

    /// Returns the end-of-file token, which holds any trailing trivia.
    #[must_use]
    pub fn end_of_file(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::EndOfFile)
    }
}

ast_node!(
    /// A sequence of statements.
    Block
);

impl Block {
    /// Iterates over the statements, including error nodes that stand in for
    /// skipped input.
    pub fn statements(&self) -> impl Iterator<Item = Statement> + use<> {
        children(&self.0)
    }

    /// Returns the trailing `return` statement, if the block has one.
    #[must_use]
    pub fn return_statement(&self) -> Option<ReturnStatement> {
        self.statements().find_map(|statement| match statement {
            Statement::Return(ret) => Some(ret),
            _ => None,
        })
    }
}

ast_node!(
    /// A node produced by error recovery.
    ///
    /// Holds skipped tokens, or nothing at all when it marks a missing
    /// expression.
    ErrorNode => Error
);

impl ErrorNode {
    /// Iterates over the skipped tokens.
    pub fn skipped_tokens(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.0.tokens()
    }

    /// Returns `true` for the empty placeholder of a missing expression.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.green().children().is_empty()
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_enum!(
    /// Any statement.
    Statement {
        Empty(EmptyStatement),
        LocalVariable(LocalVariableDeclaration),
        LocalFunction(LocalFunctionDeclaration),
        Function(FunctionDeclaration),
        Assignment(AssignmentStatement),
        Call(CallStatement),
        Expression(ExpressionStatement),
        Do(DoStatement),
        While(WhileStatement),
        Repeat(RepeatStatement),
        If(IfStatement),
        NumericFor(NumericForStatement),
        GenericFor(GenericForStatement),
        Return(ReturnStatement),
        Break(BreakStatement),
        Goto(GotoStatement),
        Label(LabelStatement),
        Error(ErrorNode),
    }
);

ast_node!(
    /// `;`
    EmptyStatement
);

ast_node!(
    /// `local names [= values]`
    LocalVariableDeclaration
);

impl LocalVariableDeclaration {
    /// Returns the `local` keyword.
    #[must_use]
    pub fn local_keyword(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Local)
    }

    /// Iterates over the declared names.
    pub fn names(&self) -> impl Iterator<Item = LocalName> + use<> {
        child::<LocalNameList>(&self.0)
            .into_iter()
            .flat_map(|list| children(&list.0))
    }

    /// Returns the `=` token, if the declaration has initial values.
    #[must_use]
    pub fn equals(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Equals)
    }

    /// Iterates over the initial values.
    pub fn values(&self) -> impl Iterator<Item = Expression> + use<> {
        child::<ExpressionList>(&self.0)
            .into_iter()
            .flat_map(|list| list.expressions())
    }
}

ast_node!(
    /// The names of a local declaration.
    LocalNameList
);

ast_node!(
    /// A declared local, with its optional `<attribute>`.
    LocalName
);

impl LocalName {
    /// Returns the name token.
    #[must_use]
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }

    /// Returns the attribute, if present.
    #[must_use]
    pub fn attribute(&self) -> Option<Attribute> {
        child(&self.0)
    }
}

ast_node!(
    /// `<const>` or `<close>`.
    Attribute
);

impl Attribute {
    /// Returns the attribute name token.
    #[must_use]
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }
}

ast_node!(
    /// `local function name body`
    LocalFunctionDeclaration
);

impl LocalFunctionDeclaration {
    /// Returns the function name token.
    #[must_use]
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }

    /// Returns the parameters and body.
    #[must_use]
    pub fn body(&self) -> Option<FunctionBody> {
        child(&self.0)
    }
}

ast_node!(
    /// `function a.b:c body`
    FunctionDeclaration
);

impl FunctionDeclaration {
    /// Returns the dotted (and optionally method) name.
    #[must_use]
    pub fn name(&self) -> Option<FunctionName> {
        child(&self.0)
    }

    /// Returns the parameters and body.
    #[must_use]
    pub fn body(&self) -> Option<FunctionBody> {
        child(&self.0)
    }
}

ast_node!(
    /// `a.b.c` or `a.b:c` naming a declared function.
    FunctionName
);

impl FunctionName {
    /// Iterates over the dotted path segments, excluding a method name.
    pub fn path(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        let method = self.method_name();
        self.0
            .child_tokens()
            .filter(|token| token.kind() == TokenKind::Identifier)
            .filter(move |token| Some(token) != method.as_ref())
    }

    /// Returns the name after `:`, if this declares a method.
    #[must_use]
    pub fn method_name(&self) -> Option<SyntaxToken> {
        let mut tokens = self.0.child_tokens();
        tokens.find(|token| token.kind() == TokenKind::Colon)?;
        tokens.find(|token| token.kind() == TokenKind::Identifier)
    }

    /// Returns `true` if the name uses `:` and so takes an implicit `self`.
    #[must_use]
    pub fn is_method(&self) -> bool {
        token(&self.0, TokenKind::Colon).is_some()
    }
}

ast_node!(
    /// `(params) block end`
    FunctionBody
);

impl FunctionBody {
    /// Returns the parameter list.
    #[must_use]
    pub fn parameters(&self) -> Option<ParameterList> {
        child(&self.0)
    }

    /// Returns the body block.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }

    /// Returns the closing `end`.
    #[must_use]
    pub fn end_keyword(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::End)
    }
}

ast_node!(
    /// `a, b, ...`
    ParameterList
);

impl ParameterList {
    /// Iterates over the named parameters.
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.0
            .child_tokens()
            .filter(|token| token.kind() == TokenKind::Identifier)
    }

    /// Returns the `...` token, if the function is variadic.
    #[must_use]
    pub fn vararg(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::DotDotDot)
    }
}

ast_node!(
    /// `targets = values`
    AssignmentStatement
);

impl AssignmentStatement {
    /// Iterates over the assigned places.
    pub fn targets(&self) -> impl Iterator<Item = Expression> + use<> {
        child::<AssignmentTargetList>(&self.0)
            .into_iter()
            .flat_map(|list| children(&list.0))
    }

    /// Iterates over the assigned values.
    pub fn values(&self) -> impl Iterator<Item = Expression> + use<> {
        child::<ExpressionList>(&self.0)
            .into_iter()
            .flat_map(|list| list.expressions())
    }
}

ast_node!(AssignmentTargetList);

ast_node!(
    /// A function or method call in statement position.
    CallStatement
);

impl CallStatement {
    /// Returns the call expression.
    #[must_use]
    pub fn call(&self) -> Option<Expression> {
        child(&self.0)
    }
}

ast_node!(
    /// An expression in statement position that is not a call.
    ///
    /// Only valid as the whole of an interactive chunk.
    ExpressionStatement
);

impl ExpressionStatement {
    /// Returns the expression.
    #[must_use]
    pub fn expression(&self) -> Option<Expression> {
        child(&self.0)
    }
}

ast_node!(
    /// `do block end`
    DoStatement
);

impl DoStatement {
    /// Returns the body.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(
    /// `while cond do block end`
    WhileStatement
);

impl WhileStatement {
    /// Returns the loop condition.
    #[must_use]
    pub fn condition(&self) -> Option<Expression> {
        child(&self.0)
    }

    /// Returns the loop body.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }

    /// Returns the closing `end`.
    #[must_use]
    pub fn end_keyword(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::End)
    }
}

ast_node!(
    /// `repeat block until cond`
    RepeatStatement
);

impl RepeatStatement {
    /// Returns the loop body.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }

    /// Returns the condition after `until`.
    #[must_use]
    pub fn condition(&self) -> Option<Expression> {
        child(&self.0)
    }
}

ast_node!(
    /// `if cond then block {elseif} [else] end`
    IfStatement
);

impl IfStatement {
    /// Returns the condition of the first branch.
    #[must_use]
    pub fn condition(&self) -> Option<Expression> {
        child(&self.0)
    }

    /// Returns the block of the first branch.
    #[must_use]
    pub fn then_block(&self) -> Option<Block> {
        child(&self.0)
    }

    /// Iterates over the `elseif` branches.
    pub fn else_if_clauses(&self) -> impl Iterator<Item = ElseIfClause> + use<> {
        self.0
            .child_of_kind(SyntaxKind::ElseIfClauseList)
            .into_iter()
            .flat_map(|list| children(&list))
    }

    /// Returns the `else` branch.
    #[must_use]
    pub fn else_clause(&self) -> Option<ElseClause> {
        child(&self.0)
    }

    /// Returns the closing `end`.
    #[must_use]
    pub fn end_keyword(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::End)
    }
}

ast_node!(
    /// `elseif cond then block`
    ElseIfClause
);

impl ElseIfClause {
    /// Returns the branch condition.
    #[must_use]
    pub fn condition(&self) -> Option<Expression> {
        child(&self.0)
    }

    /// Returns the branch block.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(
    /// `else block`
    ElseClause
);

impl ElseClause {
    /// Returns the branch block.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(
    /// `for name = start, limit [, step] do block end`
    NumericForStatement
);

impl NumericForStatement {
    /// Returns the control variable.
    #[must_use]
    pub fn variable(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }

    /// Returns the initial value.
    #[must_use]
    pub fn start(&self) -> Option<Expression> {
        nth_expression(&self.0, 0)
    }

    /// Returns the limit.
    #[must_use]
    pub fn limit(&self) -> Option<Expression> {
        nth_expression(&self.0, 1)
    }

    /// Returns the `,` that introduces the step, if a step is given.
    #[must_use]
    pub fn step_comma(&self) -> Option<SyntaxToken> {
        nth_token(&self.0, TokenKind::Comma, 1)
    }

    /// Returns the step, if given.
    #[must_use]
    pub fn step(&self) -> Option<Expression> {
        self.step_comma()?;
        nth_expression(&self.0, 2)
    }

    /// Returns the loop body.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(
    /// `for names in values do block end`
    GenericForStatement
);

impl GenericForStatement {
    /// Iterates over the loop variables.
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.0
            .child_of_kind(SyntaxKind::NameList)
            .into_iter()
            .flat_map(|list| list.child_tokens())
            .filter(|token| token.kind() == TokenKind::Identifier)
    }

    /// Iterates over the iterator expressions after `in`.
    pub fn values(&self) -> impl Iterator<Item = Expression> + use<> {
        child::<ExpressionList>(&self.0)
            .into_iter()
            .flat_map(|list| list.expressions())
    }

    /// Returns the loop body.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(
    /// `return [values] [;]`
    ReturnStatement
);

impl ReturnStatement {
    /// Iterates over the returned values.
    pub fn values(&self) -> impl Iterator<Item = Expression> + use<> {
        child::<ExpressionList>(&self.0)
            .into_iter()
            .flat_map(|list| list.expressions())
    }

    /// Returns the optional trailing `;`.
    #[must_use]
    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Semicolon)
    }
}

ast_node!(
    /// `break`
    BreakStatement
);

ast_node!(
    /// `goto name`
    GotoStatement
);

impl GotoStatement {
    /// Returns the target label name.
    #[must_use]
    pub fn label(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }
}

ast_node!(
    /// `::name::`
    LabelStatement
);

impl LabelStatement {
    /// Returns the label name.
    #[must_use]
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_enum!(
    /// Any expression.
    Expression {
        Literal(LiteralExpression),
        Vararg(VarargExpression),
        Name(NameExpression),
        Parenthesized(ParenthesizedExpression),
        MemberAccess(MemberAccessExpression),
        Index(IndexExpression),
        FunctionCall(FunctionCallExpression),
        MethodCall(MethodCallExpression),
        AnonymousFunction(AnonymousFunctionExpression),
        TableConstructor(TableConstructorExpression),
        Binary(BinaryExpression),
        Unary(UnaryExpression),
        Error(ErrorNode),
    }
);

impl Expression {
    /// Returns `true` for call expressions, the only ones allowed as
    /// statements.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Self::FunctionCall(_) | Self::MethodCall(_))
    }

    /// Returns `true` for expressions that can be assigned to.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Name(_) | Self::MemberAccess(_) | Self::Index(_))
    }
}

ast_node!(ExpressionList);

impl ExpressionList {
    /// Iterates over the expressions, in order.
    pub fn expressions(&self) -> impl Iterator<Item = Expression> + use<> {
        children(&self.0)
    }
}

/// The decoded value of a literal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `nil`
    Nil,
    /// `true` or `false`
    Boolean(bool),
    /// An integer numeral.
    Integer(i64),
    /// A float numeral.
    Float(f64),
    /// A string literal, as decoded bytes.
    String(EcoVec<u8>),
}

ast_node!(
    /// `nil`, `true`, `false`, a numeral or a string.
    LiteralExpression
);

impl LiteralExpression {
    /// Returns the literal token.
    #[must_use]
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.child_tokens().next()
    }

    /// Returns the decoded value.
    #[must_use]
    pub fn value(&self) -> Option<LiteralValue> {
        let token = self.token()?;
        match token.kind() {
            TokenKind::Nil => Some(LiteralValue::Nil),
            TokenKind::True => Some(LiteralValue::Boolean(true)),
            TokenKind::False => Some(LiteralValue::Boolean(false)),
            TokenKind::Number | TokenKind::String => match token.value() {
                TokenValue::Integer(value) => Some(LiteralValue::Integer(*value)),
                TokenValue::Float(value) => Some(LiteralValue::Float(*value)),
                TokenValue::Bytes(bytes) => Some(LiteralValue::String(bytes.clone())),
                TokenValue::None => None,
            },
            _ => None,
        }
    }
}

ast_node!(
    /// `...`
    VarargExpression
);

ast_node!(
    /// A variable reference.
    NameExpression
);

impl NameExpression {
    /// Returns the name token.
    #[must_use]
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }
}

ast_node!(
    /// `(expr)`
    ParenthesizedExpression
);

impl ParenthesizedExpression {
    /// Returns the wrapped expression.
    #[must_use]
    pub fn expression(&self) -> Option<Expression> {
        child(&self.0)
    }
}

ast_node!(
    /// `target.name`
    MemberAccessExpression
);

impl MemberAccessExpression {
    /// Returns the expression being accessed.
    #[must_use]
    pub fn target(&self) -> Option<Expression> {
        child(&self.0)
    }

    /// Returns the member name.
    #[must_use]
    pub fn member(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }
}

ast_node!(
    /// `target[index]`
    IndexExpression
);

impl IndexExpression {
    /// Returns the expression being indexed.
    #[must_use]
    pub fn target(&self) -> Option<Expression> {
        nth_expression(&self.0, 0)
    }

    /// Returns the key expression.
    #[must_use]
    pub fn index(&self) -> Option<Expression> {
        nth_expression(&self.0, 1)
    }
}

ast_node!(
    /// `callee args`
    FunctionCallExpression
);

impl FunctionCallExpression {
    /// Returns the called expression.
    #[must_use]
    pub fn callee(&self) -> Option<Expression> {
        child(&self.0)
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> Option<CallArguments> {
        child(&self.0)
    }

    /// Returns the string token if the call takes exactly one string
    /// literal argument, in either the `f "s"` or the `f("s")` form.
    #[must_use]
    pub fn single_string_argument(&self) -> Option<SyntaxToken> {
        self.arguments()?.single_string_literal()
    }
}

ast_node!(
    /// `receiver:name args`
    MethodCallExpression
);

impl MethodCallExpression {
    /// Returns the receiver, passed as `self`.
    #[must_use]
    pub fn receiver(&self) -> Option<Expression> {
        child(&self.0)
    }

    /// Returns the method name.
    #[must_use]
    pub fn method(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> Option<CallArguments> {
        child(&self.0)
    }
}

ast_enum!(
    /// The arguments of a call.
    CallArguments {
        Parenthesized(ParenthesizedArguments),
        String(StringArgument),
        Table(TableArgument),
    }
);

impl CallArguments {
    /// Returns the string token if the arguments are exactly one string
    /// literal.
    #[must_use]
    pub fn single_string_literal(&self) -> Option<SyntaxToken> {
        match self {
            Self::String(argument) => argument.string(),
            Self::Parenthesized(arguments) => {
                let mut values = arguments.values();
                let (Some(Expression::Literal(literal)), None) = (values.next(), values.next())
                else {
                    return None;
                };
                literal
                    .token()
                    .filter(|token| token.kind() == TokenKind::String)
            }
            Self::Table(_) => None,
        }
    }
}

ast_node!(
    /// `(values)` after a callee.
    ParenthesizedArguments
);

impl ParenthesizedArguments {
    /// Iterates over the argument expressions.
    pub fn values(&self) -> impl Iterator<Item = Expression> + use<> {
        child::<ExpressionList>(&self.0)
            .into_iter()
            .flat_map(|list| list.expressions())
    }
}

ast_node!(
    /// A string literal used as the sole argument.
    StringArgument
);

impl StringArgument {
    /// Returns the string token.
    #[must_use]
    pub fn string(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::String)
    }
}

ast_node!(
    /// A table constructor used as the sole argument.
    TableArgument
);

impl TableArgument {
    /// Returns the table constructor.
    #[must_use]
    pub fn table(&self) -> Option<TableConstructorExpression> {
        child(&self.0)
    }
}

ast_node!(
    /// `function body`
    AnonymousFunctionExpression
);

impl AnonymousFunctionExpression {
    /// Returns the parameters and body.
    #[must_use]
    pub fn body(&self) -> Option<FunctionBody> {
        child(&self.0)
    }
}

ast_node!(
    /// `{ fields }`
    TableConstructorExpression
);

impl TableConstructorExpression {
    /// Iterates over the fields.
    pub fn fields(&self) -> impl Iterator<Item = Field> + use<> {
        self.0
            .child_of_kind(SyntaxKind::FieldList)
            .into_iter()
            .flat_map(|list| children(&list))
    }
}

ast_enum!(
    /// A table constructor field.
    Field {
        IdentifierKeyed(IdentifierKeyedField),
        ExpressionKeyed(ExpressionKeyedField),
        Unkeyed(UnkeyedField),
    }
);

impl Field {
    /// Returns the value expression.
    #[must_use]
    pub fn value(&self) -> Option<Expression> {
        match self {
            Self::IdentifierKeyed(field) => field.value(),
            Self::ExpressionKeyed(field) => field.value(),
            Self::Unkeyed(field) => field.value(),
        }
    }
}

ast_node!(
    /// `name = value`
    IdentifierKeyedField
);

impl IdentifierKeyedField {
    /// Returns the key name.
    #[must_use]
    pub fn key(&self) -> Option<SyntaxToken> {
        token(&self.0, TokenKind::Identifier)
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> Option<Expression> {
        child(&self.0)
    }
}

ast_node!(
    /// `[key] = value`
    ExpressionKeyedField
);

impl ExpressionKeyedField {
    /// Returns the key expression.
    #[must_use]
    pub fn key(&self) -> Option<Expression> {
        nth_expression(&self.0, 0)
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> Option<Expression> {
        nth_expression(&self.0, 1)
    }
}

ast_node!(
    /// A positional field.
    UnkeyedField
);

impl UnkeyedField {
    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> Option<Expression> {
        child(&self.0)
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `or`
    Or,
    /// `and`
    And,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `~=`
    NotEqual,
    /// `==`
    Equal,
    /// `|`
    BitwiseOr,
    /// `~`
    BitwiseXor,
    /// `&`
    BitwiseAnd,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `..`
    Concat,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `//`
    FloorDivide,
    /// `%`
    Modulo,
    /// `^`
    Power,
}

impl BinaryOperator {
    /// Maps an operator token to its binary operator.
    #[must_use]
    pub const fn from_token_kind(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Or => Self::Or,
            TokenKind::And => Self::And,
            TokenKind::Less => Self::Less,
            TokenKind::Greater => Self::Greater,
            TokenKind::LessEquals => Self::LessEqual,
            TokenKind::GreaterEquals => Self::GreaterEqual,
            TokenKind::TildeEquals => Self::NotEqual,
            TokenKind::EqualsEquals => Self::Equal,
            TokenKind::Pipe => Self::BitwiseOr,
            TokenKind::Tilde => Self::BitwiseXor,
            TokenKind::Ampersand => Self::BitwiseAnd,
            TokenKind::LessLess => Self::ShiftLeft,
            TokenKind::GreaterGreater => Self::ShiftRight,
            TokenKind::DotDot => Self::Concat,
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Subtract,
            TokenKind::Star => Self::Multiply,
            TokenKind::Slash => Self::Divide,
            TokenKind::DoubleSlash => Self::FloorDivide,
            TokenKind::Percent => Self::Modulo,
            TokenKind::Caret => Self::Power,
            _ => return None,
        })
    }
}

ast_node!(
    /// `lhs op rhs`
    BinaryExpression
);

impl BinaryExpression {
    /// Returns the left operand.
    #[must_use]
    pub fn lhs(&self) -> Option<Expression> {
        nth_expression(&self.0, 0)
    }

    /// Returns the operator token.
    #[must_use]
    pub fn operator_token(&self) -> Option<SyntaxToken> {
        self.0.child_tokens().next()
    }

    /// Returns the operator.
    #[must_use]
    pub fn operator(&self) -> Option<BinaryOperator> {
        BinaryOperator::from_token_kind(self.operator_token()?.kind())
    }

    /// Returns the right operand.
    #[must_use]
    pub fn rhs(&self) -> Option<Expression> {
        nth_expression(&self.0, 1)
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `not`
    Not,
    /// `-`
    Negate,
    /// `#`
    Length,
    /// `~`
    BitwiseNot,
}

impl UnaryOperator {
    /// Maps an operator token to its unary operator.
    #[must_use]
    pub const fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Not => Some(Self::Not),
            TokenKind::Minus => Some(Self::Negate),
            TokenKind::Hash => Some(Self::Length),
            TokenKind::Tilde => Some(Self::BitwiseNot),
            _ => None,
        }
    }
}

ast_node!(
    /// `op operand`
    UnaryExpression
);

impl UnaryExpression {
    /// Returns the operator token.
    #[must_use]
    pub fn operator_token(&self) -> Option<SyntaxToken> {
        self.0.child_tokens().next()
    }

    /// Returns the operator.
    #[must_use]
    pub fn operator(&self) -> Option<UnaryOperator> {
        UnaryOperator::from_token_kind(self.operator_token()?.kind())
    }

    /// Returns the operand.
    #[must_use]
    pub fn operand(&self) -> Option<Expression> {
        child(&self.0)
    }
}
