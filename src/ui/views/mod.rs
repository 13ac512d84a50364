mod housing;
mod job_detail;
mod job_list;
mod salary;

pub use housing::HousingView;
pub use job_detail::JobDetailView;
pub use job_list::JobListView;
pub use salary::SalaryView;
