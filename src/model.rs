//! A small integer-linear model representation, kept independent of any
//! particular backend so encodings can be tested by evaluating candidate
//! assignments directly.

/// Handle to one decision variable in a [`Model`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in creation order, matching [`Model::domains`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VarDomain {
    /// Zero or one.
    Bool,
    /// Any integer in `lo..=hi`.
    Int {
        /// Inclusive lower bound.
        lo: i64,
        /// Inclusive upper bound.
        hi: i64,
    },
}

/// Either a live variable or a constant the model has already pinned.
///
/// Constants fold into the constant term of any [`LinearExpr`] they are added
/// to, so pinned tiles never cost the backend a variable or a constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Operand {
    Var(VarId),
    Const(i64),
}

/// A linear combination of variables plus a constant term.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinearExpr {
    pub(crate) terms: Vec<(i64, VarId)>,
    pub(crate) constant: i64,
}

impl LinearExpr {
    pub(crate) fn with_capacity(terms: usize) -> Self {
        Self { terms: Vec::with_capacity(terms), constant: 0 }
    }

    pub(crate) fn add_mul(&mut self, coeff: i64, operand: Operand) {
        match operand {
            Operand::Var(var) => self.terms.push((coeff, var)),
            Operand::Const(value) => self.constant += coeff * value,
        }
    }

    pub(crate) fn leq(self, rhs: i64) -> LinearConstraint {
        LinearConstraint { expr: self, cmp: Comparator::Leq, rhs }
    }

    pub(crate) fn geq(self, rhs: i64) -> LinearConstraint {
        LinearConstraint { expr: self, cmp: Comparator::Geq, rhs }
    }

    pub(crate) fn eq(self, rhs: i64) -> LinearConstraint {
        LinearConstraint { expr: self, cmp: Comparator::Eq, rhs }
    }

    /// The `(coefficient, variable)` terms.
    pub fn terms(&self) -> &[(i64, VarId)] {
        &self.terms
    }

    /// The constant term.
    pub fn constant(&self) -> i64 {
        self.constant
    }

    pub(crate) fn eval(&self, solution: &Solution) -> i64 {
        self.constant + self.terms.iter().map(|&(coeff, var)| coeff * solution.value_of(var)).sum::<i64>()
    }
}

/// Comparison direction of a [`LinearConstraint`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Comparator {
    /// Expression at most the right-hand side.
    Leq,
    /// Expression exactly the right-hand side.
    Eq,
    /// Expression at least the right-hand side.
    Geq,
}

/// One row of the model: `expr cmp rhs`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinearConstraint {
    pub(crate) expr: LinearExpr,
    pub(crate) cmp: Comparator,
    pub(crate) rhs: i64,
}

impl LinearConstraint {
    /// The left-hand side.
    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    /// The comparison direction.
    pub fn comparator(&self) -> Comparator {
        self.cmp
    }

    /// The right-hand side.
    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    pub(crate) fn holds(&self, solution: &Solution) -> bool {
        let lhs = self.expr.eval(solution);
        match self.cmp {
            Comparator::Leq => lhs <= self.rhs,
            Comparator::Eq => lhs == self.rhs,
            Comparator::Geq => lhs >= self.rhs,
        }
    }
}

/// A complete assignment: one integer per variable, indexed by [`VarId`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    values: Vec<i64>,
}

impl Solution {
    /// Wrap raw values, in variable creation order.
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// The value assigned to `var`.
    pub fn value_of(&self, var: VarId) -> i64 {
        self.values[var.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

/// A maximization model over integer variables and linear constraints.
#[derive(Clone, Debug, Default)]
pub struct Model {
    domains: Vec<VarDomain>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl Model {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bool_var(&mut self) -> VarId {
        self.new_var(VarDomain::Bool)
    }

    pub(crate) fn int_var(&mut self, lo: i64, hi: i64) -> VarId {
        self.new_var(VarDomain::Int { lo, hi })
    }

    fn new_var(&mut self, domain: VarDomain) -> VarId {
        let id = VarId(self.domains.len());
        self.domains.push(domain);
        id
    }

    pub(crate) fn constrain(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub(crate) fn maximize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Domains of all variables, in creation order.
    pub fn domains(&self) -> &[VarDomain] {
        &self.domains
    }

    /// All constraint rows.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// The expression being maximized.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub(crate) fn var_count(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Whether `solution` assigns every variable within its domain and
    /// satisfies every constraint.
    pub fn satisfied_by(&self, solution: &Solution) -> bool {
        solution.len() == self.domains.len()
            && self.domains.iter().enumerate().all(|(index, domain)| {
                let value = solution.value_of(VarId(index));
                match *domain {
                    VarDomain::Bool => value == 0 || value == 1,
                    VarDomain::Int { lo, hi } => (lo..=hi).contains(&value),
                }
            })
            && self.constraints.iter().all(|constraint| constraint.holds(solution))
    }

    /// The exact objective value of `solution`, constant term included.
    pub fn objective_value(&self, solution: &Solution) -> i64 {
        self.objective.eval(solution)
    }
}
