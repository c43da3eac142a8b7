//! x86-64 code generation. Emits AT&T-syntax text assembly for the
//! resolved, type-checked AST: globals and the string pool into `.data`,
//! one stack frame per function into `.text`. Exponentiation, string
//! equality, bounds checks and `print` lower into runtime library calls.

pub mod label;
pub mod scratch;
pub mod strings;

use std::fmt::{self, Write};

use crate::ast::{BinaryOp, Decl, Expr, ExprKind, Stmt, StmtKind, Symbol, SymbolKind, TypeKind, UnaryOp};
use crate::context::{Context, Phase};
use crate::intern::Interner;
use label::Labels;
use scratch::ScratchTable;
use strings::StringPool;

const ARG_REGS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];
const CALLEE_SAVED: [&str; 5] = ["%rbx", "%r12", "%r13", "%r14", "%r15"];

pub struct Codegen<'ctx> {
    out: String,
    interner: &'ctx Interner,
    diags: &'ctx mut Context,
    scratch: ScratchTable,
    labels: Labels,
    strings: StringPool,
    /// Parameter count of the function being emitted; local slots start
    /// after the parameter slots.
    current_params: i32,
    /// Label of the current function's epilogue.
    return_label: String,
}

/// Generates assembly for a whole translation unit.
pub fn generate(interner: &Interner, diags: &mut Context, root: Option<&Decl<'_>>) -> String {
    let mut gen = Codegen {
        out: String::new(),
        interner,
        diags,
        scratch: ScratchTable::new(),
        labels: Labels::new(),
        strings: StringPool::new(),
        current_params: 0,
        return_label: String::new(),
    };
    gen.run(root).expect("writing assembly to a string cannot fail");
    gen.out
}

impl<'ctx> Codegen<'ctx> {
    fn error(&mut self, message: String) {
        self.diags.error(Phase::Codegen, message);
    }

    fn run(&mut self, root: Option<&Decl<'_>>) -> fmt::Result {
        // Globals first, then functions, so each section header is
        // emitted at most once.
        let mut current = root;
        while let Some(d) = current {
            if d.ty.get().kind != TypeKind::Function {
                self.gen_global(d)?;
            }
            current = d.next.get();
        }
        let mut current = root;
        while let Some(d) = current {
            if d.ty.get().kind == TypeKind::Function && d.body.is_some() {
                self.gen_function(d)?;
            }
            current = d.next.get();
        }
        if !self.strings.is_empty() {
            writeln!(self.out, ".data")?;
            self.strings.write_data(self.interner, &mut self.out)?;
        }
        Ok(())
    }

    fn ensure_data(&mut self) -> fmt::Result {
        if !self.diags.data_flag {
            self.diags.data_flag = true;
            writeln!(self.out, ".data")?;
        }
        Ok(())
    }

    fn ensure_text(&mut self) -> fmt::Result {
        if !self.diags.text_flag {
            self.diags.text_flag = true;
            writeln!(self.out, ".text")?;
        }
        Ok(())
    }

    fn alloc_reg(&mut self) -> usize {
        match self.scratch.alloc() {
            Some(r) => r,
            None => {
                self.error("expression too complex: ran out of scratch registers".to_string());
                0
            }
        }
    }

    /// Operand addressing one symbol: globals by name, params and locals
    /// as negative frame offsets with locals numbered after parameters.
    fn symbol_address(&self, sym: &Symbol<'_>) -> String {
        match sym.kind {
            SymbolKind::Global => format!("{}(%rip)", self.interner.resolve(sym.name)),
            SymbolKind::Param => format!("-{}(%rbp)", 8 * (sym.which.get() + 1)),
            SymbolKind::Local => {
                format!("-{}(%rbp)", 8 * (self.current_params + sym.which.get() + 1))
            }
        }
    }

    // ------------------------------------------------------------------
    // Globals
    // ------------------------------------------------------------------

    /// Constant value of a global initializer; the type checker already
    /// restricted these to literals and negated literals.
    fn const_value(&mut self, e: &Expr<'_>) -> i64 {
        match &e.kind {
            ExprKind::IntegerLit(v) | ExprKind::HexLit(v) | ExprKind::BinaryLit(v) => *v,
            ExprKind::CharLit(c) => *c as i64,
            ExprKind::BooleanLit(b) => *b as i64,
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => -self.const_value(operand),
            ExprKind::DoubleLit(_) | ExprKind::ScientificLit(_) => {
                self.error("double values are not supported in code generation".to_string());
                0
            }
            ExprKind::Group(inner) => self.const_value(inner),
            _ => 0,
        }
    }

    fn gen_global(&mut self, d: &Decl<'_>) -> fmt::Result {
        let name = self.interner.resolve(d.name).to_string();
        let ty = d.ty.get();
        match ty.kind {
            TypeKind::Integer | TypeKind::Boolean | TypeKind::Character => {
                let value = match d.value {
                    Some(v) => self.const_value(v),
                    None => 0,
                };
                self.ensure_data()?;
                writeln!(self.out, "{}:\n\t.quad {}", name, value)
            }
            TypeKind::String => {
                let operand = match d.value {
                    Some(v) => match v.unwrap_groups().kind {
                        ExprKind::StringLit(lit) => self.strings.add(lit, &mut self.labels),
                        _ => "0".to_string(),
                    },
                    None => "0".to_string(),
                };
                self.ensure_data()?;
                writeln!(self.out, "{}:\n\t.quad {}", name, operand)
            }
            TypeKind::Array | TypeKind::Carray => self.gen_global_array(d, &name),
            TypeKind::Double => {
                self.error("double values are not supported in code generation".to_string());
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Global arrays use the runtime layout: the length in slot zero,
    /// elements after it.
    fn gen_global_array(&mut self, d: &Decl<'_>, name: &str) -> fmt::Result {
        let ty = d.ty.get();
        let element = ty.subtype.get();
        if element.map(|t| t.kind.is_array()).unwrap_or(false) {
            self.error("multi-dimensional arrays are not supported in code generation".to_string());
            return Ok(());
        }
        let element_kind = element.map(|t| t.kind);
        if element_kind == Some(TypeKind::Double) {
            self.error("double values are not supported in code generation".to_string());
            return Ok(());
        }

        let length = match ty.length.get().map(|l| &l.kind) {
            Some(ExprKind::IntegerLit(n)) => *n,
            _ => 0,
        };
        let mut parts = vec![length.to_string()];
        let mut items = match d.value.map(|v| &v.unwrap_groups().kind) {
            Some(ExprKind::Braces { items }) => *items,
            _ => None,
        };
        while let Some(node) = items {
            let ExprKind::Args { arg, next } = &node.kind else {
                break;
            };
            if element_kind == Some(TypeKind::String) {
                match arg.unwrap_groups().kind {
                    ExprKind::StringLit(lit) => {
                        parts.push(self.strings.add(lit, &mut self.labels))
                    }
                    _ => parts.push("0".to_string()),
                }
            } else {
                let value = self.const_value(arg);
                parts.push(value.to_string());
            }
            items = *next;
        }
        // Uninitialized slots are zeroed.
        while (parts.len() as i64) < length + 1 {
            parts.push("0".to_string());
        }

        self.ensure_data()?;
        writeln!(self.out, "{}:\n\t.quad {}", name, parts.join(", "))
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn gen_function(&mut self, d: &Decl<'_>) -> fmt::Result {
        let name = self.interner.resolve(d.name).to_string();
        let params = d.param_count.get();
        let locals = d.locals.get();
        if params > ARG_REGS.len() as i32 {
            self.error(format!(
                "function '{}' has more than {} parameters",
                name,
                ARG_REGS.len()
            ));
            return Ok(());
        }

        self.ensure_text()?;
        self.current_params = params;
        self.return_label = self.labels.next_control();

        writeln!(self.out, ".global {}", name)?;
        writeln!(self.out, "{}:", name)?;
        writeln!(self.out, "\tpushq %rbp")?;
        writeln!(self.out, "\tmovq %rsp, %rbp")?;
        for reg in ARG_REGS.iter().take(params as usize) {
            writeln!(self.out, "\tpushq {}", reg)?;
        }
        if locals > 0 {
            writeln!(self.out, "\tsubq ${}, %rsp", 8 * locals)?;
        }
        for reg in CALLEE_SAVED {
            writeln!(self.out, "\tpushq {}", reg)?;
        }

        if let Some(body) = d.body {
            if let StmtKind::Block { body: Some(inner) } = &body.kind {
                let mut current = Some(*inner);
                while let Some(stmt) = current {
                    self.gen_stmt(stmt)?;
                    current = stmt.next.get();
                }
            }
        }

        let done = self.return_label.clone();
        writeln!(self.out, "{}:", done)?;
        for reg in CALLEE_SAVED.iter().rev() {
            writeln!(self.out, "\tpopq {}", reg)?;
        }
        writeln!(self.out, "\tmovq %rbp, %rsp")?;
        writeln!(self.out, "\tpopq %rbp")?;
        writeln!(self.out, "\tret")
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn gen_stmt(&mut self, s: &Stmt<'_>) -> fmt::Result {
        match &s.kind {
            StmtKind::Decl(d) => self.gen_local_decl(d),
            StmtKind::Expr(e) => {
                let r = self.gen_expr(e)?;
                self.scratch.free(r);
                Ok(())
            }
            StmtKind::IfElse {
                cond,
                body,
                else_body,
            } => {
                let else_label = self.labels.next_control();
                let done_label = self.labels.next_control();
                let r = self.gen_expr(cond)?;
                writeln!(self.out, "\tcmpq $0, {}", ScratchTable::name(r))?;
                writeln!(self.out, "\tje {}", else_label)?;
                self.scratch.free(r);
                self.gen_stmt(body)?;
                writeln!(self.out, "\tjmp {}", done_label)?;
                writeln!(self.out, "{}:", else_label)?;
                if let Some(els) = else_body {
                    self.gen_stmt(els)?;
                }
                writeln!(self.out, "{}:", done_label)
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                let top_label = self.labels.next_control();
                let done_label = self.labels.next_control();
                if let Some(init) = init {
                    let r = self.gen_expr(init)?;
                    self.scratch.free(r);
                }
                writeln!(self.out, "{}:", top_label)?;
                if let Some(cond) = cond {
                    let r = self.gen_expr(cond)?;
                    writeln!(self.out, "\tcmpq $0, {}", ScratchTable::name(r))?;
                    writeln!(self.out, "\tje {}", done_label)?;
                    self.scratch.free(r);
                }
                self.gen_stmt(body)?;
                if let Some(update) = update {
                    let r = self.gen_expr(update)?;
                    self.scratch.free(r);
                }
                writeln!(self.out, "\tjmp {}", top_label)?;
                writeln!(self.out, "{}:", done_label)
            }
            StmtKind::Print { args } => {
                let mut current = *args;
                while let Some(node) = current {
                    let ExprKind::Args { arg, next } = &node.kind else {
                        break;
                    };
                    self.gen_print_arg(arg)?;
                    current = *next;
                }
                Ok(())
            }
            StmtKind::Return { value } => {
                if let Some(value) = value {
                    let r = self.gen_expr(value)?;
                    writeln!(self.out, "\tmovq {}, %rax", ScratchTable::name(r))?;
                    self.scratch.free(r);
                }
                writeln!(self.out, "\tjmp {}", self.return_label)
            }
            StmtKind::Block { body } => {
                let mut current = *body;
                while let Some(stmt) = current {
                    self.gen_stmt(stmt)?;
                    current = stmt.next.get();
                }
                Ok(())
            }
        }
    }

    fn gen_local_decl(&mut self, d: &Decl<'_>) -> fmt::Result {
        let ty = d.ty.get();
        match ty.kind {
            TypeKind::Array | TypeKind::Carray => {
                let name = self.interner.resolve(d.name).to_string();
                self.error(format!(
                    "local array '{}' is not supported in code generation",
                    name
                ));
                Ok(())
            }
            TypeKind::Double => {
                self.error("double values are not supported in code generation".to_string());
                Ok(())
            }
            _ => {
                if let (Some(sym), Some(value)) = (d.symbol.get(), d.value) {
                    let r = self.gen_expr(value)?;
                    let addr = self.symbol_address(sym);
                    writeln!(self.out, "\tmovq {}, {}", ScratchTable::name(r), addr)?;
                    self.scratch.free(r);
                }
                Ok(())
            }
        }
    }

    fn gen_print_arg(&mut self, arg: &Expr<'_>) -> fmt::Result {
        let kind = arg.ty.get().map(|t| t.kind);
        let entry = match kind {
            Some(TypeKind::Integer) => "print_integer",
            Some(TypeKind::String) => "print_string",
            Some(TypeKind::Boolean) => "print_boolean",
            Some(TypeKind::Character) => "print_character",
            Some(TypeKind::Double) => {
                self.error("double values are not supported in code generation".to_string());
                return Ok(());
            }
            _ => return Ok(()),
        };
        let r = self.gen_expr(arg)?;
        writeln!(self.out, "\tpushq %r10")?;
        writeln!(self.out, "\tpushq %r11")?;
        writeln!(self.out, "\tmovq {}, %rdi", ScratchTable::name(r))?;
        writeln!(self.out, "\tcall {}", entry)?;
        writeln!(self.out, "\tpopq %r11")?;
        writeln!(self.out, "\tpopq %r10")?;
        self.scratch.free(r);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Emits code leaving the expression's value in the returned scratch
    /// register.
    fn gen_expr(&mut self, e: &Expr<'_>) -> Result<usize, fmt::Error> {
        match &e.kind {
            ExprKind::IntegerLit(v) | ExprKind::HexLit(v) | ExprKind::BinaryLit(v) => {
                let r = self.alloc_reg();
                writeln!(self.out, "\tmovq ${}, {}", v, ScratchTable::name(r))?;
                Ok(r)
            }
            ExprKind::BooleanLit(b) => {
                let r = self.alloc_reg();
                writeln!(self.out, "\tmovq ${}, {}", *b as i64, ScratchTable::name(r))?;
                Ok(r)
            }
            ExprKind::CharLit(c) => {
                let r = self.alloc_reg();
                writeln!(self.out, "\tmovq ${}, {}", *c as i64, ScratchTable::name(r))?;
                Ok(r)
            }
            ExprKind::DoubleLit(_) | ExprKind::ScientificLit(_) => {
                self.error("double values are not supported in code generation".to_string());
                let r = self.alloc_reg();
                writeln!(self.out, "\tmovq $0, {}", ScratchTable::name(r))?;
                Ok(r)
            }
            ExprKind::StringLit(lit) => {
                let label = self.strings.add(*lit, &mut self.labels);
                let r = self.alloc_reg();
                writeln!(self.out, "\tleaq {}(%rip), {}", label, ScratchTable::name(r))?;
                Ok(r)
            }
            ExprKind::Ident(_) => {
                let r = self.alloc_reg();
                let Some(sym) = e.symbol.get() else {
                    writeln!(self.out, "\tmovq $0, {}", ScratchTable::name(r))?;
                    return Ok(r);
                };
                let ty = sym.ty.get();
                if ty.kind == TypeKind::Double {
                    self.error("double values are not supported in code generation".to_string());
                    writeln!(self.out, "\tmovq $0, {}", ScratchTable::name(r))?;
                    return Ok(r);
                }
                // A global array's value is its address; everything else
                // loads from its slot.
                if ty.kind.is_array() && sym.kind == SymbolKind::Global {
                    writeln!(
                        self.out,
                        "\tleaq {}(%rip), {}",
                        self.interner.resolve(sym.name),
                        ScratchTable::name(r)
                    )?;
                } else {
                    let addr = self.symbol_address(sym);
                    writeln!(self.out, "\tmovq {}, {}", addr, ScratchTable::name(r))?;
                }
                Ok(r)
            }
            ExprKind::Group(inner) => self.gen_expr(inner),
            ExprKind::Binary {
                op: BinaryOp::Assign,
                left,
                right,
            } => self.gen_assign(left, right),
            ExprKind::Binary { op, left, right } => self.gen_binary(*op, left, right),
            ExprKind::Unary { op, operand } => self.gen_unary(*op, operand),
            ExprKind::Call { callee, args } => self.gen_call(callee, *args),
            ExprKind::Index { array, index } => {
                let base = self.gen_expr(array)?;
                let idx = self.gen_expr(index)?;
                self.emit_bounds_check(base, idx)?;
                writeln!(
                    self.out,
                    "\tmovq 8({},{},8), {}",
                    ScratchTable::name(base),
                    ScratchTable::name(idx),
                    ScratchTable::name(base)
                )?;
                self.scratch.free(idx);
                Ok(base)
            }
            ExprKind::Braces { .. } => {
                self.error(
                    "brace initializers are only supported in global declarations".to_string(),
                );
                let r = self.alloc_reg();
                writeln!(self.out, "\tmovq $0, {}", ScratchTable::name(r))?;
                Ok(r)
            }
            ExprKind::Args { arg, .. } => self.gen_expr(arg),
        }
    }

    fn gen_assign(&mut self, left: &Expr<'_>, right: &Expr<'_>) -> Result<usize, fmt::Error> {
        let value = self.gen_expr(right)?;
        match &left.unwrap_groups().kind {
            ExprKind::Ident(_) => {
                if let Some(sym) = left.unwrap_groups().symbol.get() {
                    let addr = self.symbol_address(sym);
                    writeln!(self.out, "\tmovq {}, {}", ScratchTable::name(value), addr)?;
                }
            }
            ExprKind::Index { array, index } => {
                let base = self.gen_expr(array)?;
                let idx = self.gen_expr(index)?;
                self.emit_bounds_check(base, idx)?;
                writeln!(
                    self.out,
                    "\tmovq {}, 8({},{},8)",
                    ScratchTable::name(value),
                    ScratchTable::name(base),
                    ScratchTable::name(idx)
                )?;
                self.scratch.free(base);
                self.scratch.free(idx);
            }
            _ => {}
        }
        Ok(value)
    }

    fn gen_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr<'_>,
        right: &Expr<'_>,
    ) -> Result<usize, fmt::Error> {
        let l = self.gen_expr(left)?;
        let r = self.gen_expr(right)?;
        let lname = ScratchTable::name(l);
        let rname = ScratchTable::name(r);
        match op {
            BinaryOp::Add => writeln!(self.out, "\taddq {}, {}", rname, lname)?,
            BinaryOp::Sub => writeln!(self.out, "\tsubq {}, {}", rname, lname)?,
            BinaryOp::Mul => {
                writeln!(self.out, "\tmovq {}, %rax", lname)?;
                writeln!(self.out, "\timulq {}", rname)?;
                writeln!(self.out, "\tmovq %rax, {}", lname)?;
            }
            BinaryOp::Div => {
                writeln!(self.out, "\tmovq {}, %rax", lname)?;
                writeln!(self.out, "\tcqto")?;
                writeln!(self.out, "\tidivq {}", rname)?;
                writeln!(self.out, "\tmovq %rax, {}", lname)?;
            }
            BinaryOp::Rem => {
                writeln!(self.out, "\tmovq {}, %rax", lname)?;
                writeln!(self.out, "\tcqto")?;
                writeln!(self.out, "\tidivq {}", rname)?;
                writeln!(self.out, "\tmovq %rdx, {}", lname)?;
            }
            BinaryOp::Expo => {
                self.emit_runtime_call2("integer_power", l, r)?;
            }
            BinaryOp::And => writeln!(self.out, "\tandq {}, {}", rname, lname)?,
            BinaryOp::Or => writeln!(self.out, "\torq {}, {}", rname, lname)?,
            BinaryOp::Eq | BinaryOp::NotEq
                if left.ty.get().map(|t| t.kind) == Some(TypeKind::String) =>
            {
                let entry = if op == BinaryOp::Eq {
                    "str_equal"
                } else {
                    "str_not_equal"
                };
                self.emit_runtime_call2(entry, l, r)?;
            }
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => {
                let jump = match op {
                    BinaryOp::Eq => "je",
                    BinaryOp::NotEq => "jne",
                    BinaryOp::Lt => "jl",
                    BinaryOp::LtEq => "jle",
                    BinaryOp::Gt => "jg",
                    _ => "jge",
                };
                let true_label = self.labels.next_control();
                let done_label = self.labels.next_control();
                writeln!(self.out, "\tcmpq {}, {}", rname, lname)?;
                writeln!(self.out, "\t{} {}", jump, true_label)?;
                writeln!(self.out, "\tmovq $0, {}", lname)?;
                writeln!(self.out, "\tjmp {}", done_label)?;
                writeln!(self.out, "{}:", true_label)?;
                writeln!(self.out, "\tmovq $1, {}", lname)?;
                writeln!(self.out, "{}:", done_label)?;
            }
            BinaryOp::Assign => unreachable!("assignment is handled in gen_assign"),
        }
        self.scratch.free(r);
        Ok(l)
    }

    /// Calls a two-argument runtime entry, leaving the result in the left
    /// register.
    fn emit_runtime_call2(&mut self, entry: &str, l: usize, r: usize) -> fmt::Result {
        writeln!(self.out, "\tpushq %r10")?;
        writeln!(self.out, "\tpushq %r11")?;
        writeln!(self.out, "\tmovq {}, %rdi", ScratchTable::name(l))?;
        writeln!(self.out, "\tmovq {}, %rsi", ScratchTable::name(r))?;
        writeln!(self.out, "\tcall {}", entry)?;
        writeln!(self.out, "\tpopq %r11")?;
        writeln!(self.out, "\tpopq %r10")?;
        writeln!(self.out, "\tmovq %rax, {}", ScratchTable::name(l))
    }

    fn emit_bounds_check(&mut self, base: usize, idx: usize) -> fmt::Result {
        writeln!(self.out, "\tpushq %r10")?;
        writeln!(self.out, "\tpushq %r11")?;
        writeln!(self.out, "\tmovq {}, %rdi", ScratchTable::name(base))?;
        writeln!(self.out, "\tmovq {}, %rsi", ScratchTable::name(idx))?;
        writeln!(self.out, "\tcall check_bounds")?;
        writeln!(self.out, "\tpopq %r11")?;
        writeln!(self.out, "\tpopq %r10")
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr<'_>) -> Result<usize, fmt::Error> {
        match op {
            UnaryOp::Negate => {
                let r = self.gen_expr(operand)?;
                writeln!(self.out, "\tnegq {}", ScratchTable::name(r))?;
                Ok(r)
            }
            UnaryOp::Not => {
                let r = self.gen_expr(operand)?;
                writeln!(self.out, "\txorq $1, {}", ScratchTable::name(r))?;
                Ok(r)
            }
            UnaryOp::Length => {
                let r = self.gen_expr(operand)?;
                writeln!(
                    self.out,
                    "\tmovq ({}), {}",
                    ScratchTable::name(r),
                    ScratchTable::name(r)
                )?;
                Ok(r)
            }
            UnaryOp::Increment | UnaryOp::Decrement => {
                // Postfix: the expression's value is the old one.
                let r = self.gen_expr(operand)?;
                match operand.unwrap_groups().symbol.get() {
                    Some(sym) => {
                        let addr = self.symbol_address(sym);
                        let insn = if op == UnaryOp::Increment {
                            "addq"
                        } else {
                            "subq"
                        };
                        writeln!(self.out, "\t{} $1, {}", insn, addr)?;
                    }
                    None => {
                        self.error(format!(
                            "operator '{}' requires a variable operand",
                            op.token()
                        ));
                    }
                }
                Ok(r)
            }
        }
    }

    fn gen_call(
        &mut self,
        callee: &Expr<'_>,
        args: Option<&Expr<'_>>,
    ) -> Result<usize, fmt::Error> {
        let name = match callee.unwrap_groups().kind {
            ExprKind::Ident(n) => self.interner.resolve(n).to_string(),
            _ => {
                self.error("calling a computed expression is not supported".to_string());
                let r = self.alloc_reg();
                writeln!(self.out, "\tmovq $0, {}", ScratchTable::name(r))?;
                return Ok(r);
            }
        };

        let mut arg_regs = Vec::new();
        let mut current = args;
        while let Some(node) = current {
            let ExprKind::Args { arg, next } = &node.kind else {
                break;
            };
            if arg_regs.len() == ARG_REGS.len() {
                self.error(format!(
                    "call to '{}' passes more than {} arguments",
                    name,
                    ARG_REGS.len()
                ));
                break;
            }
            arg_regs.push(self.gen_expr(arg)?);
            current = *next;
        }
        for (i, r) in arg_regs.iter().enumerate() {
            writeln!(self.out, "\tmovq {}, {}", ScratchTable::name(*r), ARG_REGS[i])?;
        }
        for r in arg_regs {
            self.scratch.free(r);
        }

        writeln!(self.out, "\tpushq %r10")?;
        writeln!(self.out, "\tpushq %r11")?;
        writeln!(self.out, "\tcall {}", name)?;
        writeln!(self.out, "\tpopq %r11")?;
        writeln!(self.out, "\tpopq %r10")?;
        let r = self.alloc_reg();
        writeln!(self.out, "\tmovq %rax, {}", ScratchTable::name(r))?;
        Ok(r)
    }
}
