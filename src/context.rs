//! Grammar-position context threaded through the parser
//!
//! A [`Context`] is an immutable-per-call bitmask: each production receives it
//! by value, derives the value for a nested region by flipping exactly the bits
//! whose semantics change there, and discards the derived value on return.
//! Nothing is ever mutated in place, so parses are re-entrant by construction.

use bitflags::bitflags;

bitflags! {
    /// Grammar-position facts that pure recursive descent cannot express
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Context: u32 {
        /// Strict mode code (directive prologue, module, or class body).
        /// Sticky: only ever turned on, never off, within one parse.
        const STRICT = 1 << 0;
        /// Module goal symbol
        const MODULE = 1 << 1;
        /// The `in` operator is allowed in a relational expression
        /// (cleared inside `for (... ; ...)` head initializers)
        const IN = 1 << 2;
        /// `yield` is an expression here (inside a generator)
        const YIELD = 1 << 3;
        /// `await` is an expression here (inside async code or module top level)
        const AWAIT = 1 << 4;
        /// `return` statements are allowed
        const RETURN = 1 << 5;
        /// Direct child of the program body (import/export position)
        const TOP_LEVEL = 1 << 6;
        /// Inside an iteration statement (`continue` target exists)
        const ITERATION = 1 << 7;
        /// Inside a switch block (`break` target exists)
        const SWITCH = 1 << 8;
        /// Inside any function body (`new.target` is meaningful)
        const FUNCTION = 1 << 9;
        /// Inside a method (`super.property` is meaningful)
        const METHOD = 1 << 10;
        /// Inside a derived-class constructor (`super(...)` is meaningful)
        const SUPER_CALL = 1 << 11;
        /// Inside a class body (private names are meaningful)
        const CLASS = 1 << 12;
        /// Inside formal parameters (restricts `yield`/`await` expressions)
        const PARAMETERS = 1 << 13;
        /// Inside a class static initialization block (`await` is reserved)
        const STATIC_BLOCK = 1 << 14;
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::IN | Self::TOP_LEVEL
    }
}

impl Context {
    pub fn has_strict(self) -> bool {
        self.contains(Self::STRICT)
    }

    pub fn has_module(self) -> bool {
        self.contains(Self::MODULE)
    }

    pub fn has_in(self) -> bool {
        self.contains(Self::IN)
    }

    pub fn has_yield(self) -> bool {
        self.contains(Self::YIELD)
    }

    pub fn has_await(self) -> bool {
        self.contains(Self::AWAIT)
    }

    pub fn has_return(self) -> bool {
        self.contains(Self::RETURN)
    }

    pub fn has_top_level(self) -> bool {
        self.contains(Self::TOP_LEVEL)
    }

    pub fn has_iteration(self) -> bool {
        self.contains(Self::ITERATION)
    }

    pub fn has_switch(self) -> bool {
        self.contains(Self::SWITCH)
    }

    pub fn has_function(self) -> bool {
        self.contains(Self::FUNCTION)
    }

    pub fn has_method(self) -> bool {
        self.contains(Self::METHOD)
    }

    pub fn has_super_call(self) -> bool {
        self.contains(Self::SUPER_CALL)
    }

    pub fn has_class(self) -> bool {
        self.contains(Self::CLASS)
    }

    pub fn has_parameters(self) -> bool {
        self.contains(Self::PARAMETERS)
    }

    pub fn has_static_block(self) -> bool {
        self.contains(Self::STATIC_BLOCK)
    }

    fn and(self, flag: Self, set: bool) -> Self {
        if set {
            self | flag
        } else {
            self - flag
        }
    }

    /// Add the strict bit when `include` holds; strictness never comes back off
    pub fn union_strict_if(self, include: bool) -> Self {
        if include {
            self | Self::STRICT
        } else {
            self
        }
    }

    pub fn union_yield_if(self, include: bool) -> Self {
        if include {
            self | Self::YIELD
        } else {
            self
        }
    }

    pub fn union_await_if(self, include: bool) -> Self {
        if include {
            self | Self::AWAIT
        } else {
            self
        }
    }

    pub fn and_in(self, set: bool) -> Self {
        self.and(Self::IN, set)
    }

    pub fn and_yield(self, set: bool) -> Self {
        self.and(Self::YIELD, set)
    }

    pub fn and_await(self, set: bool) -> Self {
        self.and(Self::AWAIT, set)
    }

    pub fn and_return(self, set: bool) -> Self {
        self.and(Self::RETURN, set)
    }

    pub fn and_iteration(self, set: bool) -> Self {
        self.and(Self::ITERATION, set)
    }

    pub fn and_switch(self, set: bool) -> Self {
        self.and(Self::SWITCH, set)
    }

    pub fn and_parameters(self, set: bool) -> Self {
        self.and(Self::PARAMETERS, set)
    }

    pub fn and_top_level(self, set: bool) -> Self {
        self.and(Self::TOP_LEVEL, set)
    }

    pub fn and_method(self, set: bool) -> Self {
        self.and(Self::METHOD, set)
    }

    pub fn and_super_call(self, set: bool) -> Self {
        self.and(Self::SUPER_CALL, set)
    }

    pub fn and_class(self, set: bool) -> Self {
        self.and(Self::CLASS, set)
    }

    pub fn and_static_block(self, set: bool) -> Self {
        self.and(Self::STATIC_BLOCK, set)
    }

    /// The context for a directly nested function body: grammar-position bits
    /// of the enclosing code (iteration, switch, labels' relevance, parameter
    /// position) do not survive the function boundary, strictness does.
    pub fn for_function_body(self, is_async: bool, is_generator: bool) -> Self {
        let mut ctx = (self & (Self::STRICT | Self::MODULE | Self::CLASS)) | Self::RETURN | Self::IN | Self::FUNCTION;
        ctx = ctx.union_yield_if(is_generator);
        ctx = ctx.union_await_if(is_async);
        ctx
    }

    /// The context for an arrow function body. Arrows have no `this` of their
    /// own, so `super`, `new.target` and method position all pass through from
    /// the enclosing scope; `yield` never does and `await` follows the arrow's
    /// own async flag.
    pub fn for_arrow_body(self, is_async: bool) -> Self {
        let kept = self
            & (Self::STRICT
                | Self::MODULE
                | Self::CLASS
                | Self::FUNCTION
                | Self::METHOD
                | Self::SUPER_CALL);
        (kept | Self::RETURN | Self::IN).union_await_if(is_async)
    }
}
