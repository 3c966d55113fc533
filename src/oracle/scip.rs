use std::ffi::{CString, c_int};
use std::mem::MaybeUninit;

use log::trace;
use scip_sys as ffi;

use crate::error::OracleError;
use crate::master::{FractionalSolution, IntegralSolution, MasterProblem};
use crate::oracle::{FractionalOracle, IntegralOracle};

macro_rules! scip_call {
    ($res:expr) => {
        let res = unsafe { $res };
        if res != ffi::SCIP_Retcode_SCIP_OKAY {
            return Err(OracleError::Solver(format!(
                "SCIP call failed with return code {res}"
            )));
        }
    };
}

/// Solves both master problems with SCIP.
///
/// A fresh SCIP instance is built for every call. Presolving, propagation, primal heuristics
/// and separation are switched off so that the fractional solve is a plain LP over the original
/// rows and their duals can be read back directly.
#[derive(Debug, Clone, Default)]
pub struct ScipOracle {
    verbose: bool,
}

impl ScipOracle {
    pub fn new() -> Self {
        ScipOracle::default()
    }

    /// Lets SCIP print its log to stdout.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn build(
        &self,
        master: &MasterProblem<'_>,
        var_type: ffi::SCIP_Vartype,
    ) -> Result<ScipPtr, OracleError> {
        let mut scip = ScipPtr::new()?;
        if !self.verbose {
            scip.set_int_param("display/verblevel", 0)?;
        }
        scip.set_presolving_off()?;
        scip.set_int_param("propagating/maxrounds", 0)?;
        scip.set_int_param("propagating/maxroundsroot", 0)?;
        if let Some(limit) = master.time_limit() {
            scip.set_real_param("limits/time", limit.as_secs_f64())?;
        }
        scip.create_prob("binpacking-master")?;

        let ub = if var_type == ffi::SCIP_Vartype_SCIP_VARTYPE_BINARY {
            1.0
        } else {
            scip.infinity()
        };
        for (pattern, &cost) in master.objective().iter().enumerate() {
            scip.create_var(cost, ub, &format!("pattern_{pattern}"), var_type)?;
        }
        for item in 0..master.n_rows() {
            scip.create_partition_row(master.row(item), &format!("item_{item}"))?;
        }
        trace!(
            "SCIP master problem with {} columns and {} rows",
            master.n_columns(),
            master.n_rows()
        );
        Ok(scip)
    }
}

impl FractionalOracle for ScipOracle {
    fn solve_fractional(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        let scip = self.build(master, ffi::SCIP_Vartype_SCIP_VARTYPE_CONTINUOUS)?;
        scip.solve()?;
        match scip.status() {
            ffi::SCIP_Status_SCIP_STATUS_OPTIMAL => {}
            ffi::SCIP_Status_SCIP_STATUS_INFEASIBLE => return Err(OracleError::Infeasible),
            status => {
                return Err(OracleError::Solver(format!(
                    "LP solve stopped with status {status}"
                )));
            }
        }

        let duals = scip
            .conss
            .iter()
            .map(|&cons| scip.dual(cons))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FractionalSolution {
            objective: scip.obj_val(),
            duals,
        })
    }
}

impl IntegralOracle for ScipOracle {
    fn solve_integral(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        let scip = self.build(master, ffi::SCIP_Vartype_SCIP_VARTYPE_BINARY)?;
        scip.solve()?;
        if scip.status() == ffi::SCIP_Status_SCIP_STATUS_INFEASIBLE {
            return Err(OracleError::Infeasible);
        }
        // a time limit still leaves the incumbent usable
        let Some(sol) = scip.best_sol() else {
            return Err(OracleError::Solver(format!(
                "no integral solution found, status {}",
                scip.status()
            )));
        };

        let threshold = master.selection_threshold();
        let selected = scip
            .vars
            .iter()
            .enumerate()
            .filter(|&(_, &var)| unsafe { ffi::SCIPgetSolVal(scip.raw, sol, var) } > threshold)
            .map(|(pattern, _)| pattern)
            .collect();
        Ok(IntegralSolution {
            objective: scip.obj_val(),
            selected,
        })
    }
}

/// Owns one SCIP instance together with the variables and rows created on it.
struct ScipPtr {
    raw: *mut ffi::SCIP,
    vars: Vec<*mut ffi::SCIP_VAR>,
    conss: Vec<*mut ffi::SCIP_CONS>,
}

impl ScipPtr {
    fn new() -> Result<Self, OracleError> {
        let mut raw = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreate(raw.as_mut_ptr()));
        let scip = ScipPtr {
            raw: unsafe { raw.assume_init() },
            vars: Vec::new(),
            conss: Vec::new(),
        };
        scip_call!(ffi::SCIPincludeDefaultPlugins(scip.raw));
        Ok(scip)
    }

    fn set_int_param(&mut self, param: &str, value: c_int) -> Result<(), OracleError> {
        let param = c_string(param)?;
        scip_call!(ffi::SCIPsetIntParam(self.raw, param.as_ptr(), value));
        Ok(())
    }

    fn set_real_param(&mut self, param: &str, value: f64) -> Result<(), OracleError> {
        let param = c_string(param)?;
        scip_call!(ffi::SCIPsetRealParam(self.raw, param.as_ptr(), value));
        Ok(())
    }

    fn set_presolving_off(&mut self) -> Result<(), OracleError> {
        let off = ffi::SCIP_ParamSetting_SCIP_PARAMSETTING_OFF;
        scip_call!(ffi::SCIPsetPresolving(self.raw, off, true.into()));
        scip_call!(ffi::SCIPsetHeuristics(self.raw, off, true.into()));
        scip_call!(ffi::SCIPsetSeparating(self.raw, off, true.into()));
        Ok(())
    }

    fn create_prob(&mut self, name: &str) -> Result<(), OracleError> {
        let name = c_string(name)?;
        scip_call!(ffi::SCIPcreateProbBasic(self.raw, name.as_ptr()));
        Ok(())
    }

    fn infinity(&self) -> f64 {
        unsafe { ffi::SCIPinfinity(self.raw) }
    }

    fn create_var(
        &mut self,
        obj: f64,
        ub: f64,
        name: &str,
        var_type: ffi::SCIP_Vartype,
    ) -> Result<(), OracleError> {
        let name = c_string(name)?;
        let mut var = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreateVarBasic(
            self.raw,
            var.as_mut_ptr(),
            name.as_ptr(),
            0.0,
            ub,
            obj,
            var_type,
        ));
        let var = unsafe { var.assume_init() };
        self.vars.push(var);
        scip_call!(ffi::SCIPaddVar(self.raw, var));
        Ok(())
    }

    /// Adds `Σ_{p ∈ patterns} λ_p = 1`.
    fn create_partition_row(&mut self, patterns: &[usize], name: &str) -> Result<(), OracleError> {
        let name = c_string(name)?;
        let mut cons = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreateConsBasicLinear(
            self.raw,
            cons.as_mut_ptr(),
            name.as_ptr(),
            0,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            1.0,
            1.0,
        ));
        let cons = unsafe { cons.assume_init() };
        self.conss.push(cons);
        for &pattern in patterns {
            let Some(&var) = self.vars.get(pattern) else {
                return Err(OracleError::Malformed(format!(
                    "row {name:?} references unknown pattern {pattern}"
                )));
            };
            scip_call!(ffi::SCIPaddCoefLinear(self.raw, cons, var, 1.0));
        }
        scip_call!(ffi::SCIPaddCons(self.raw, cons));
        Ok(())
    }

    fn solve(&self) -> Result<(), OracleError> {
        scip_call!(ffi::SCIPsolve(self.raw));
        Ok(())
    }

    fn status(&self) -> ffi::SCIP_Status {
        unsafe { ffi::SCIPgetStatus(self.raw) }
    }

    fn obj_val(&self) -> f64 {
        unsafe { ffi::SCIPgetPrimalbound(self.raw) }
    }

    fn best_sol(&self) -> Option<*mut ffi::SCIP_SOL> {
        if unsafe { ffi::SCIPgetNSols(self.raw) } == 0 {
            return None;
        }
        Some(unsafe { ffi::SCIPgetBestSol(self.raw) })
    }

    /// Dual value of an original row, read from its transformed counterpart.
    fn dual(&self, cons: *mut ffi::SCIP_CONS) -> Result<f64, OracleError> {
        let mut transformed = MaybeUninit::<*mut ffi::SCIP_CONS>::uninit();
        scip_call!(ffi::SCIPgetTransformedCons(
            self.raw,
            cons,
            transformed.as_mut_ptr()
        ));
        let transformed = unsafe { transformed.assume_init() };
        if transformed.is_null() {
            return Err(OracleError::Solver("row was removed before solving".into()));
        }
        Ok(unsafe { ffi::SCIPgetDualsolLinear(self.raw, transformed) })
    }
}

impl Drop for ScipPtr {
    fn drop(&mut self) {
        // the problem holds its own references; release the ones taken at creation
        for var in self.vars.iter_mut() {
            unsafe { ffi::SCIPreleaseVar(self.raw, var) };
        }
        for cons in self.conss.iter_mut() {
            unsafe { ffi::SCIPreleaseCons(self.raw, cons) };
        }
        unsafe { ffi::SCIPfree(&mut self.raw) };
    }
}

fn c_string(value: &str) -> Result<CString, OracleError> {
    CString::new(value).map_err(|err| OracleError::Malformed(err.to_string()))
}
