pub mod problem_ctx;
pub mod solution_flow;

pub use problem_ctx::{FetchOptions, PreparedSolution, SolveOptions, SubmitOptions};
pub use solution_flow::{select_snippet, Collaborators, SolutionFlow};
