//! Scripted platform used by the manager and screen tests.

use crate::auth::{
    AuthCallback, Authenticators, BiometricPlatform, Capability, EnrollmentResult, PromptInfo,
};
use std::future::Future;
use std::sync::Mutex;

#[derive(Default)]
struct Record {
    queried: Vec<Authenticators>,
    prompts: Vec<PromptInfo>,
    callbacks: Vec<AuthCallback>,
    enrollments: Vec<Authenticators>,
}

pub struct ScriptedPlatform {
    capability: Mutex<Capability>,
    enrollment_result: Mutex<EnrollmentResult>,
    record: Mutex<Record>,
}

impl ScriptedPlatform {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability: Mutex::new(capability),
            enrollment_result: Mutex::new(EnrollmentResult::Completed),
            record: Mutex::new(Record::default()),
        }
    }

    pub fn set_capability(&self, capability: Capability) {
        *self.capability.lock().unwrap() = capability;
    }

    pub fn set_enrollment_result(&self, result: EnrollmentResult) {
        *self.enrollment_result.lock().unwrap() = result;
    }

    pub fn prompt_count(&self) -> usize {
        self.record.lock().unwrap().prompts.len()
    }

    pub fn prompts(&self) -> Vec<PromptInfo> {
        self.record.lock().unwrap().prompts.clone()
    }

    pub fn queried_authenticators(&self) -> Vec<Authenticators> {
        self.record.lock().unwrap().queried.clone()
    }

    pub fn last_callback(&self) -> Option<AuthCallback> {
        self.record.lock().unwrap().callbacks.last().cloned()
    }

    pub fn enrollments(&self) -> Vec<Authenticators> {
        self.record.lock().unwrap().enrollments.clone()
    }
}

impl BiometricPlatform for ScriptedPlatform {
    fn can_authenticate(
        &self,
        authenticators: Authenticators,
    ) -> impl Future<Output = Capability> + Send {
        self.record.lock().unwrap().queried.push(authenticators);
        let capability = self.capability.lock().unwrap().clone();
        async move {
            // Lets concurrent callers interleave with the check, as a bus round trip would
            tokio::task::yield_now().await;
            capability
        }
    }

    fn authenticate(
        &self,
        prompt: PromptInfo,
        callback: AuthCallback,
    ) -> impl Future<Output = ()> + Send {
        let mut record = self.record.lock().unwrap();
        record.prompts.push(prompt);
        record.callbacks.push(callback);
        async {}
    }

    fn launch_enrollment(
        &self,
        authenticators: Authenticators,
    ) -> impl Future<Output = EnrollmentResult> + Send {
        self.record.lock().unwrap().enrollments.push(authenticators);
        let result = *self.enrollment_result.lock().unwrap();
        async move {
            tokio::task::yield_now().await;
            result
        }
    }
}
