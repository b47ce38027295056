//! GraphQL documents issued by this client, with the fields they select.

use super::Operation;

pub const CURRENT_USER: Operation = Operation {
    name: "CurrentUser",
    query: r#"query CurrentUser {
  currentUser {
    id
    uid
    profile { id name birthDate gender height weight activityLevel imageURL }
  }
}"#,
};

/// The signed-in user's workouts with groups, exercises and set logs.
pub const WORKOUTS: Operation = Operation {
    name: "Workouts",
    query: r#"query Workouts {
  currentUser {
    id
    workouts {
      id
      date
      createdAt
      updatedAt
      workoutGroup { id title date }
      workoutExercises {
        id
        exercise { id name category description }
        setLogs { id weight repCount setNumber }
      }
    }
  }
}"#,
};

pub const EXERCISES: Operation = Operation {
    name: "Exercises",
    query: r#"query Exercises {
  exercises { id name description category }
}"#,
};

pub const START_WORKOUT: Operation = Operation {
    name: "StartWorkout",
    query: r#"mutation StartWorkout($input: StartWorkoutInput) {
  startWorkout(input: $input) { id date createdAt updatedAt }
}"#,
};

pub const CREATE_WORKOUT_EXERCISE: Operation = Operation {
    name: "CreateWorkoutExercise",
    query: r#"mutation CreateWorkoutExercise($input: CreateWorkoutExercise!) {
  createWorkoutExercise(input: $input) {
    id
    exercise { id name category description }
  }
}"#,
};

pub const CREATE_SET_LOG: Operation = Operation {
    name: "CreateSetLog",
    query: r#"mutation CreateSetLog($input: CreateSetLog!) {
  createSetLog(input: $input) { id weight repCount setNumber }
}"#,
};

pub const WORKOUT_GROUPS: Operation = Operation {
    name: "WorkoutGroups",
    query: r#"query WorkoutGroups {
  workoutGroups { id title date imageURL createdAt updatedAt }
}"#,
};

pub const WORKOUT_GROUP: Operation = Operation {
    name: "WorkoutGroup",
    query: r#"query WorkoutGroup($id: ID!) {
  workoutGroup(id: $id) {
    id
    title
    date
    imageURL
    createdAt
    updatedAt
    workouts {
      id
      date
      createdAt
      updatedAt
      user { id uid profile { id name imageURL } }
      workoutExercises {
        id
        exercise { id name category description }
        setLogs { id weight repCount setNumber }
      }
    }
  }
}"#,
};

pub const CREATE_WORKOUT_GROUP: Operation = Operation {
    name: "CreateWorkoutGroup",
    query: r#"mutation CreateWorkoutGroup($input: CreateWorkoutGroup!) {
  createWorkoutGroup(input: $input) { id title date imageURL createdAt updatedAt }
}"#,
};

pub const ADD_WORKOUT_GROUP_MEMBER: Operation = Operation {
    name: "AddWorkoutGroupMember",
    query: r#"mutation AddWorkoutGroupMember($input: AddWorkoutGroupMember!) {
  addWorkoutGroupMember(input: $input) { id title date imageURL createdAt updatedAt }
}"#,
};

pub const FRIENDS: Operation = Operation {
    name: "GetFriends",
    query: r#"query GetFriends {
  currentUser {
    id
    friends { id uid profile { id name imageURL } }
  }
}"#,
};

pub const FRIENDSHIP_REQUESTS: Operation = Operation {
    name: "GetFriendshipRequests",
    query: r#"query GetFriendshipRequests {
  currentUser {
    id
    friendshipRequests {
      id
      status
      requester { id uid profile { id name imageURL } }
      requestee { id uid profile { id name imageURL } }
    }
  }
}"#,
};

pub const SEND_FRIENDSHIP_REQUEST: Operation = Operation {
    name: "SendFriendshipRequest",
    query: r#"mutation SendFriendshipRequest($input: SendFriendshipRequest!) {
  sendFriendshipRequest(input: $input) {
    id
    status
    requester { id uid profile { id name imageURL } }
    requestee { id uid profile { id name imageURL } }
  }
}"#,
};

pub const ACCEPT_FRIENDSHIP_REQUEST: Operation = Operation {
    name: "AcceptFriendshipRequest",
    query: r#"mutation AcceptFriendshipRequest($input: AcceptFriendshipRequest!) {
  acceptFriendshipRequest(input: $input) {
    id
    status
    requester { id uid profile { id name imageURL } }
    requestee { id uid profile { id name imageURL } }
  }
}"#,
};

pub const REJECT_FRIENDSHIP_REQUEST: Operation = Operation {
    name: "RejectFriendshipRequest",
    query: r#"mutation RejectFriendshipRequest($input: RejectFriendshipRequest!) {
  rejectFriendshipRequest(input: $input) {
    id
    status
    requester { id uid profile { id name imageURL } }
    requestee { id uid profile { id name imageURL } }
  }
}"#,
};

pub const ADD_FRIEND_BY_QR_CODE: Operation = Operation {
    name: "AddFriendByQRCode",
    query: r#"mutation AddFriendByQRCode($input: AddFriendByQRCode!) {
  addFriendByQRCode(input: $input) {
    id
    status
    requester { id uid profile { id name imageURL } }
    requestee { id uid profile { id name imageURL } }
  }
}"#,
};

pub const CREATE_PROFILE: Operation = Operation {
    name: "CreateProfile",
    query: r#"mutation CreateProfile($input: CreateProfile!) {
  createProfile(input: $input) {
    id name birthDate gender height weight activityLevel imageURL
  }
}"#,
};

pub const UPDATE_PROFILE: Operation = Operation {
    name: "UpdateProfile",
    query: r#"mutation UpdateProfile($input: UpdateProfile!) {
  updateProfile(input: $input) {
    id name birthDate gender height weight activityLevel imageURL
  }
}"#,
};
